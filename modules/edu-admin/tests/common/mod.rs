#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(dead_code)]

use edu_admin::dto::{class_info, supplier};
use edu_admin::{EduAdmin, EduAdminConfig};
use eduadmin_db::secure::RecordId;
use eduadmin_db::{ConnectOpts, DbHandle};
use eduadmin_security::SecurityContext;

pub const ADMIN: i32 = 1;
pub const LEAD: i32 = 2;
pub const ALICE: i32 = 7;
pub const BOB: i32 = 9;
pub const AUDITOR: i32 = 11;

/// Department tree: 1 HQ > 2 North > 3 North-A, and 1 HQ > 4 South.
pub const CONFIG: &str = r"
paging:
  default_size: 10
  max_size: 100
data_permission:
  enabled: true
  store:
    departments:
      - { id: 1, name: HQ }
      - { id: 2, name: North, parent_id: 1 }
      - { id: 3, name: North-A, parent_id: 2 }
      - { id: 4, name: South, parent_id: 1 }
    roles:
      - { id: 1, key: admin, data_scope: all }
      - { id: 2, key: dept_lead, data_scope: department_and_below }
      - { id: 3, key: teacher, data_scope: own }
      - { id: 4, key: auditor, data_scope: custom, dept_ids: [4] }
    users:
      - { id: 1, name: admin, dept_id: 1, role_ids: [1] }
      - { id: 2, name: lead, dept_id: 2, role_ids: [2] }
      - { id: 7, name: alice, dept_id: 3, role_ids: [3] }
      - { id: 9, name: bob, dept_id: 4, role_ids: [3] }
      - { id: 11, name: auditor, dept_id: 1, role_ids: [4] }
";

pub fn config() -> EduAdminConfig {
    serde_saphyr::from_str(CONFIG).expect("test config parses")
}

pub fn ctx(user_id: i32) -> SecurityContext {
    SecurityContext::builder().subject_id(user_id).build()
}

pub async fn memory_db() -> DbHandle {
    let opts = ConnectOpts {
        max_conns: Some(1),
        ..Default::default()
    };
    let db = DbHandle::connect("sqlite::memory:", opts)
        .await
        .expect("Failed to connect to database");
    EduAdmin::migrate(&db).await.expect("migrations apply");
    db
}

pub async fn setup() -> (DbHandle, EduAdmin) {
    setup_with(&config()).await
}

pub async fn setup_with(cfg: &EduAdminConfig) -> (DbHandle, EduAdmin) {
    let db = memory_db().await;
    let admin = EduAdmin::init(&db, cfg).expect("module initializes");
    (db, admin)
}

pub async fn add_supplier(admin: &EduAdmin, user_id: i32, name: &str, status: &str, dept_id: i32) -> RecordId {
    admin
        .suppliers()
        .create(
            &ctx(user_id),
            &supplier::InsertReq {
                name: name.to_owned(),
                status: status.to_owned(),
                dept_id,
                ..Default::default()
            },
        )
        .await
        .expect("supplier created")
}

pub async fn add_class(admin: &EduAdmin, user_id: i32, name: &str, students: i32, dept_id: i32) -> RecordId {
    admin
        .classes()
        .create(
            &ctx(user_id),
            &class_info::InsertReq {
                class_name: name.to_owned(),
                grade: "7".to_owned(),
                student_count: students,
                status: "1".to_owned(),
                dept_id,
                ..Default::default()
            },
        )
        .await
        .expect("class created")
}
