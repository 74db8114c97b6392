//! Config-backed [`RoleStore`].

use std::collections::{HashMap, HashSet, VecDeque};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{DataScope, DeptId, ResolveError, RoleAssignment, RoleGrant, RoleStore, UserId};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticRoleStoreConfig {
    #[serde(default)]
    pub departments: Vec<DepartmentConfig>,
    #[serde(default)]
    pub roles: Vec<RoleConfig>,
    #[serde(default)]
    pub users: Vec<UserConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DepartmentConfig {
    pub id: DeptId,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<DeptId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoleConfig {
    pub id: i32,
    pub key: String,
    pub data_scope: DataScope,
    #[serde(default)]
    pub dept_ids: Vec<DeptId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub dept_id: Option<DeptId>,
    #[serde(default)]
    pub role_ids: Vec<i32>,
}

/// In-memory role store built from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticRoleStore {
    children: HashMap<DeptId, Vec<DeptId>>,
    known_depts: HashSet<DeptId>,
    users: HashMap<UserId, RoleAssignment>,
}

impl StaticRoleStore {
    /// Build the store. Role references to unknown role ids are skipped.
    #[must_use]
    pub fn from_config(cfg: &StaticRoleStoreConfig) -> Self {
        let mut children: HashMap<DeptId, Vec<DeptId>> = HashMap::new();
        let mut known_depts = HashSet::new();
        for dept in &cfg.departments {
            known_depts.insert(dept.id);
            if let Some(parent) = dept.parent_id {
                children.entry(parent).or_default().push(dept.id);
            }
        }

        let roles: HashMap<i32, &RoleConfig> = cfg.roles.iter().map(|r| (r.id, r)).collect();
        let users = cfg
            .users
            .iter()
            .map(|u| {
                let grants = u
                    .role_ids
                    .iter()
                    .filter_map(|rid| roles.get(rid))
                    .map(|r| RoleGrant {
                        role_key: r.key.clone(),
                        data_scope: r.data_scope,
                        dept_ids: r.dept_ids.clone(),
                    })
                    .collect();
                (
                    u.id,
                    RoleAssignment {
                        user_id: u.id,
                        dept_id: u.dept_id,
                        grants,
                    },
                )
            })
            .collect();

        Self {
            children,
            known_depts,
            users,
        }
    }
}

#[async_trait]
impl RoleStore for StaticRoleStore {
    async fn assignment(&self, user_id: UserId) -> Result<RoleAssignment, ResolveError> {
        self.users
            .get(&user_id)
            .cloned()
            .ok_or(ResolveError::UnknownUser(user_id))
    }

    async fn descendants(&self, dept_id: DeptId) -> Result<Vec<DeptId>, ResolveError> {
        if !self.known_depts.contains(&dept_id) {
            return Err(ResolveError::UnknownDepartment(dept_id));
        }

        // Breadth-first; `seen` guards against a parent cycle in the config.
        let mut seen = HashSet::from([dept_id]);
        let mut out = Vec::new();
        let mut queue = VecDeque::from([dept_id]);
        while let Some(current) = queue.pop_front() {
            for &child in self.children.get(&current).into_iter().flatten() {
                if seen.insert(child) {
                    out.push(child);
                    queue.push_back(child);
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::{PermissionMode, PermissionResolver, SecurityContext};
    use std::sync::Arc;

    const YAML: &str = r"
departments:
  - { id: 1, name: head office }
  - { id: 2, name: north campus, parent_id: 1 }
  - { id: 3, name: grade 1, parent_id: 2 }
  - { id: 4, name: grade 2, parent_id: 2 }
  - { id: 5, name: south campus, parent_id: 1 }
roles:
  - { id: 1, key: admin, data_scope: all }
  - { id: 2, key: principal, data_scope: department_and_below }
  - { id: 3, key: teacher, data_scope: '5' }
  - { id: 4, key: auditor, data_scope: custom, dept_ids: [5] }
users:
  - { id: 1, name: root, dept_id: 1, role_ids: [1] }
  - { id: 2, name: north, dept_id: 2, role_ids: [2] }
  - { id: 7, name: alice, dept_id: 3, role_ids: [3] }
  - { id: 8, name: bob, dept_id: 3, role_ids: [3, 4] }
";

    fn store() -> StaticRoleStore {
        let cfg: StaticRoleStoreConfig = serde_saphyr::from_str(YAML).unwrap();
        StaticRoleStore::from_config(&cfg)
    }

    #[tokio::test]
    async fn descendants_walk_the_tree() {
        let s = store();
        let mut below = s.descendants(1).await.unwrap();
        below.sort_unstable();
        assert_eq!(below, vec![2, 3, 4, 5]);
        assert!(s.descendants(4).await.unwrap().is_empty());
        assert!(matches!(
            s.descendants(42).await,
            Err(ResolveError::UnknownDepartment(42))
        ));
    }

    #[tokio::test]
    async fn descendants_survive_cycles() {
        let cfg = StaticRoleStoreConfig {
            departments: vec![
                DepartmentConfig {
                    id: 1,
                    name: "a".to_owned(),
                    parent_id: Some(2),
                },
                DepartmentConfig {
                    id: 2,
                    name: "b".to_owned(),
                    parent_id: Some(1),
                },
            ],
            ..Default::default()
        };
        let s = StaticRoleStore::from_config(&cfg);
        assert_eq!(s.descendants(1).await.unwrap(), vec![2]);
    }

    #[tokio::test]
    async fn resolves_through_static_config() {
        let resolver = PermissionResolver::new(Arc::new(store()));
        let ctx = |id| SecurityContext::builder().subject_id(id).build();

        assert_eq!(
            resolver.resolve(&ctx(1)).await.unwrap().mode(),
            PermissionMode::All
        );

        let north = resolver.resolve(&ctx(2)).await.unwrap();
        assert_eq!(north.dept_ids(), &[2, 3, 4]);

        let alice = resolver.resolve(&ctx(7)).await.unwrap();
        assert_eq!(alice.mode(), PermissionMode::OwnRecords);
        assert_eq!(alice.user_id(), 7);

        let bob = resolver.resolve(&ctx(8)).await.unwrap();
        assert_eq!(bob.mode(), PermissionMode::Departments);
        assert_eq!(bob.dept_ids(), &[5]);
    }
}
