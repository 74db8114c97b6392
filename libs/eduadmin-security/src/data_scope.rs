use std::fmt;

use serde::de::{self, Deserializer, Visitor};

/// Data-scope grant carried by a role.
///
/// Deserializes from its name or from the numeric code stored in role tables (`1` .. `5`),
/// given either as an integer or as a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataScope {
    All,
    /// Explicit department list configured on the role.
    Custom,
    /// The caller's own department only.
    Department,
    /// The caller's department and all its descendants.
    DepartmentAndBelow,
    Own,
}

const NAMES: &[&str] = &["all", "custom", "department", "department_and_below", "own"];

impl DataScope {
    /// True for grants that contribute a department set.
    #[must_use]
    pub fn is_department_grant(self) -> bool {
        matches!(
            self,
            Self::Custom | Self::Department | Self::DepartmentAndBelow
        )
    }

    /// Grant for a numeric role-table code.
    #[must_use]
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            1 => Some(Self::All),
            2 => Some(Self::Custom),
            3 => Some(Self::Department),
            4 => Some(Self::DepartmentAndBelow),
            5 => Some(Self::Own),
            _ => None,
        }
    }
}

struct DataScopeVisitor;

impl Visitor<'_> for DataScopeVisitor {
    type Value = DataScope;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a data scope name or a code from 1 to 5")
    }

    fn visit_u64<E: de::Error>(self, code: u64) -> Result<DataScope, E> {
        DataScope::from_code(code)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Unsigned(code), &self))
    }

    fn visit_i64<E: de::Error>(self, code: i64) -> Result<DataScope, E> {
        u64::try_from(code)
            .ok()
            .and_then(DataScope::from_code)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Signed(code), &self))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<DataScope, E> {
        match value {
            "all" => Ok(DataScope::All),
            "custom" => Ok(DataScope::Custom),
            "department" => Ok(DataScope::Department),
            "department_and_below" => Ok(DataScope::DepartmentAndBelow),
            "own" => Ok(DataScope::Own),
            other => other
                .parse::<u64>()
                .ok()
                .and_then(DataScope::from_code)
                .ok_or_else(|| E::unknown_variant(other, NAMES)),
        }
    }
}

impl<'de> serde::Deserialize<'de> for DataScope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DataScopeVisitor)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_codes() {
        let by_name: DataScope = serde_json::from_str("\"department_and_below\"").unwrap();
        let by_code: DataScope = serde_json::from_str("\"4\"").unwrap();
        assert_eq!(by_name, DataScope::DepartmentAndBelow);
        assert_eq!(by_code, DataScope::DepartmentAndBelow);
    }

    #[test]
    fn parses_unquoted_codes() {
        #[derive(serde::Deserialize)]
        struct Role {
            data_scope: DataScope,
        }

        let from_json: DataScope = serde_json::from_str("4").unwrap();
        assert_eq!(from_json, DataScope::DepartmentAndBelow);

        let role: Role = serde_saphyr::from_str("data_scope: 5\n").unwrap();
        assert_eq!(role.data_scope, DataScope::Own);
    }

    #[test]
    fn rejects_unknown_scopes() {
        assert!(serde_json::from_str::<DataScope>("6").is_err());
        assert!(serde_json::from_str::<DataScope>("-1").is_err());
        let err = serde_json::from_str::<DataScope>("\"tenant\"").unwrap_err();
        assert!(err.to_string().contains("unknown variant"), "{err}");
    }

    #[test]
    fn serializes_by_name() {
        assert_eq!(
            serde_json::to_string(&DataScope::DepartmentAndBelow).unwrap(),
            "\"department_and_below\""
        );
    }

    #[test]
    fn department_grants() {
        assert!(DataScope::Custom.is_department_grant());
        assert!(DataScope::Department.is_department_grant());
        assert!(!DataScope::All.is_department_grant());
        assert!(!DataScope::Own.is_department_grant());
    }
}
