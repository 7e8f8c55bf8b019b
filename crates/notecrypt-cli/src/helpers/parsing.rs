//! Parsing helpers for record IDs.

use uuid::Uuid;

use crate::errors::CliError;

/// Parse a full UUID, naming the record kind in the error.
pub fn parse_id(kind: &str, value: &str) -> anyhow::Result<Uuid> {
    Uuid::parse_str(value.trim()).map_err(|e| {
        CliError::invalid_input(format!("Invalid {} ID \"{}\": {}", kind, value, e)).into()
    })
}

pub fn parse_optional_id(kind: &str, value: Option<&str>) -> anyhow::Result<Option<Uuid>> {
    value.map(|value| parse_id(kind, value)).transpose()
}

pub fn parse_ids(kind: &str, values: &[String]) -> anyhow::Result<Vec<Uuid>> {
    values.iter().map(|value| parse_id(kind, value)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_accepts_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id("note", &id.to_string()).unwrap(), id);
    }

    #[test]
    fn test_parse_id_rejects_garbage() {
        let err = parse_id("folder", "not-a-uuid").unwrap_err();
        assert!(err.to_string().contains("Invalid folder ID"));
        assert!(err.downcast_ref::<CliError>().is_some());
    }

    #[test]
    fn test_parse_optional_and_many() {
        assert_eq!(parse_optional_id("tag", None).unwrap(), None);
        let ids = vec![Uuid::new_v4().to_string(), Uuid::new_v4().to_string()];
        assert_eq!(parse_ids("tag", &ids).unwrap().len(), 2);
        assert!(parse_ids("tag", &["nope".to_string()]).is_err());
    }
}
