use chrono::Utc;
use eduadmin_db::crud::{InsertCommand, RemoveCommand, UpdateCommand};
use eduadmin_db::paging::PageRequest;
use eduadmin_db::search::Searchable;
use eduadmin_db::secure::RecordId;
use eduadmin_errors::ValidationViolation;
use sea_orm::{IntoActiveModel, Set};
use serde::{Deserialize, Serialize};

use super::{Validate, into_result, require_non_empty};
use crate::infra::storage::entity::em_textbook_sup::{ActiveModel, Entity, Model};

/// Supplier list query. Empty fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Searchable)]
#[serde(rename_all = "camelCase", default)]
pub struct GetPageReq {
    #[serde(flatten)]
    #[search(pagination)]
    pub page: PageRequest,
    #[search(op = "contains")]
    pub name: String,
    #[search(op = "exact")]
    pub status: String,
    #[search(op = "exact")]
    pub phone: String,
    /// `asc` or `desc`.
    #[search(op = "order", column = "created_at")]
    pub created_at_order: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetReq {
    pub id: RecordId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsertReq {
    pub name: String,
    pub contact: String,
    pub phone: String,
    pub address: String,
    pub status: String,
    pub remark: String,
    /// Owning department of the new row.
    pub dept_id: i32,
}

impl Validate for InsertReq {
    fn validate(&self) -> Result<(), Vec<ValidationViolation>> {
        let mut violations = Vec::new();
        require_non_empty(&mut violations, "name", &self.name);
        into_result(violations)
    }
}

impl InsertCommand<Entity> for InsertReq {
    fn generate(&self) -> ActiveModel {
        let now = Utc::now();
        ActiveModel {
            name: Set(self.name.trim().to_owned()),
            contact: Set(self.contact.clone()),
            phone: Set(self.phone.clone()),
            address: Set(self.address.clone()),
            status: Set(self.status.clone()),
            remark: Set(self.remark.clone()),
            dept_id: Set(self.dept_id),
            create_by: Set(0),
            update_by: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }
}

/// Full replacement of the editable fields. Ownership (`dept_id`, `create_by`) is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateReq {
    pub id: RecordId,
    pub name: String,
    pub contact: String,
    pub phone: String,
    pub address: String,
    pub status: String,
    pub remark: String,
}

impl Validate for UpdateReq {
    fn validate(&self) -> Result<(), Vec<ValidationViolation>> {
        let mut violations = Vec::new();
        require_non_empty(&mut violations, "name", &self.name);
        into_result(violations)
    }
}

impl UpdateCommand<Entity> for UpdateReq {
    fn id(&self) -> RecordId {
        self.id
    }

    fn apply(&self, current: Model) -> ActiveModel {
        let mut am = current.into_active_model();
        am.name = Set(self.name.trim().to_owned());
        am.contact = Set(self.contact.clone());
        am.phone = Set(self.phone.clone());
        am.address = Set(self.address.clone());
        am.status = Set(self.status.clone());
        am.remark = Set(self.remark.clone());
        am.updated_at = Set(Utc::now());
        am
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteReq {
    pub ids: Vec<RecordId>,
}

impl RemoveCommand for DeleteReq {
    fn ids(&self) -> &[RecordId] {
        &self.ids
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use eduadmin_db::search::SearchRequest;

    #[test]
    fn binds_page_query_from_camel_case() {
        let req: GetPageReq = serde_json::from_str(
            r#"{"pageIndex":2,"pageSize":20,"name":"press","createdAtOrder":"desc"}"#,
        )
        .unwrap();
        assert_eq!(req.page, PageRequest::new(2, 20));
        assert_eq!(req.name, "press");
        assert!(req.status.is_empty());
        assert_eq!(req.page(), PageRequest::new(2, 20));
    }

    #[test]
    fn declares_search_fields_in_order() {
        let fields: Vec<_> = GetPageReq::FIELDS.iter().map(|f| (f.field, f.op)).collect();
        assert_eq!(
            fields,
            vec![
                ("name", "contains"),
                ("status", "exact"),
                ("phone", "exact"),
                ("created_at_order", "order"),
            ]
        );
    }

    #[test]
    fn blank_name_is_rejected() {
        let req = InsertReq {
            name: "   ".into(),
            ..Default::default()
        };
        let violations = req.validate().unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "name");

        let ok = InsertReq {
            name: "Harbor Press".into(),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn update_keeps_ownership() {
        let now = Utc::now();
        let current = Model {
            id: 3,
            name: "old".into(),
            contact: String::new(),
            phone: String::new(),
            address: String::new(),
            status: "1".into(),
            remark: String::new(),
            dept_id: 4,
            create_by: 7,
            update_by: 7,
            created_at: now,
            updated_at: now,
        };
        let req = UpdateReq {
            id: 3,
            name: " new ".into(),
            status: "0".into(),
            ..Default::default()
        };
        let am = req.apply(current);
        assert_eq!(am.name, Set("new".to_owned()));
        assert_eq!(am.status, Set("0".to_owned()));
        assert!(!am.dept_id.is_set());
        assert!(!am.create_by.is_set());
    }
}
