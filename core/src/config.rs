use crate::{session::Role, types::DepartmentName};
use serde::{Deserialize, Serialize};

// ── Department reference data ──────────────────────────────────────

/// A routing destination. File order is the classifier's match order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Department {
    pub id: String,
    pub name: DepartmentName,
    /// Lowercase match terms, tested in order.
    pub keywords: Vec<String>,
    /// Resolution budget in hours. The only SLA table the desk consults.
    pub sla_hours: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct DepartmentsFile {
    departments: Vec<Department>,
}

// ── Routing rules ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutingRules {
    /// Used when no department keyword matches.
    pub default_department: DepartmentName,
    /// Checked first; the first hit yields High.
    pub high_priority_keywords: Vec<String>,
    /// Checked only when no high keyword hit; the first hit yields Medium.
    pub medium_priority_keywords: Vec<String>,
    /// Departments whose complaints are Medium when no keyword hit.
    pub default_medium_departments: Vec<DepartmentName>,
}

// ── SLA policy ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlaPolicy {
    /// Budget for complaints whose department is not in the reference table.
    pub default_hours: u32,
    /// Share of the budget, counted back from the deadline, that is "approaching".
    pub approaching_fraction: f64,
}

// ── User directory ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub department: Option<DepartmentName>,
    /// Demo shared secret. Not a credential store.
    pub secret: String,
}

#[derive(Debug, Clone, Deserialize)]
struct UsersFile {
    users: Vec<UserRecord>,
}

// ── Top-level config ───────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct DeskConfig {
    pub departments: Vec<Department>,
    pub routing: RoutingRules,
    pub sla: SlaPolicy,
    pub users: Vec<UserRecord>,
}

impl DeskConfig {
    /// Load from the data/ directory.
    /// In tests, use DeskConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let dept_path = format!("{data_dir}/departments/departments.json");
        let dept_content = std::fs::read_to_string(&dept_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {dept_path}: {e}"))?;
        let dept_file: DepartmentsFile = serde_json::from_str(&dept_content)?;

        let routing_path = format!("{data_dir}/routing/routing_rules.json");
        let routing_content = std::fs::read_to_string(&routing_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {routing_path}: {e}"))?;
        let routing: RoutingRules = serde_json::from_str(&routing_content)?;

        let sla_path = format!("{data_dir}/sla/sla_policy.json");
        let sla_content = std::fs::read_to_string(&sla_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {sla_path}: {e}"))?;
        let sla: SlaPolicy = serde_json::from_str(&sla_content)?;

        let users_path = format!("{data_dir}/users/users.json");
        let users_content = std::fs::read_to_string(&users_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {users_path}: {e}"))?;
        let users_file: UsersFile = serde_json::from_str(&users_content)?;

        let config = Self {
            departments: dept_file.departments,
            routing,
            sla,
            users: users_file.users,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject reference data the engine cannot route with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.departments.is_empty() {
            anyhow::bail!("No departments configured");
        }
        for dept in &self.departments {
            if dept.sla_hours == 0 {
                anyhow::bail!("Department '{}' has a zero SLA budget", dept.name);
            }
        }
        if self.department(&self.routing.default_department).is_none() {
            anyhow::bail!(
                "Default department '{}' is not a configured department",
                self.routing.default_department
            );
        }
        if self.sla.default_hours == 0 {
            anyhow::bail!("Default SLA budget must be positive");
        }
        if !(0.0..=1.0).contains(&self.sla.approaching_fraction) {
            anyhow::bail!(
                "approaching_fraction {} is outside [0, 1]",
                self.sla.approaching_fraction
            );
        }
        for user in &self.users {
            match (&user.role, &user.department) {
                (Role::SubAdmin, None) => {
                    anyhow::bail!("Sub-admin '{}' has no department", user.username)
                }
                (Role::SubAdmin, Some(dept)) if self.department(dept).is_none() => {
                    log::warn!("User '{}' is scoped to unknown department '{dept}'", user.username);
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn department(&self, name: &str) -> Option<&Department> {
        self.departments.iter().find(|d| d.name == name)
    }

    /// Config with hardcoded defaults for use in unit tests.
    /// Mirrors the files shipped under data/.
    pub fn default_test() -> Self {
        fn dept(id: &str, name: &str, keywords: &[&str], sla_hours: u32) -> Department {
            Department {
                id: id.into(),
                name: name.into(),
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
                sla_hours,
            }
        }
        fn words(list: &[&str]) -> Vec<String> {
            list.iter().map(|w| w.to_string()).collect()
        }
        fn user(id: &str, username: &str, name: &str, department: Option<&str>) -> UserRecord {
            UserRecord {
                id: id.into(),
                username: username.into(),
                name: name.into(),
                role: if department.is_some() { Role::SubAdmin } else { Role::MainAdmin },
                department: department.map(String::from),
                secret: "password".into(),
            }
        }

        Self {
            departments: vec![
                dept("water", "Water",
                    &["water", "leak", "pipe", "tap", "drainage", "sewage", "plumbing"], 48),
                dept("roads", "Roads",
                    &["road", "pothole", "street", "traffic", "signal", "sign", "pavement"], 72),
                dept("electricity", "Electricity",
                    &["electricity", "power", "light", "streetlight", "wire", "pole", "outage"], 48),
                dept("garbage", "Garbage",
                    &["garbage", "waste", "trash", "dustbin", "cleaning", "sanitation"], 24),
                dept("health", "Health",
                    &["health", "hospital", "medical", "doctor", "medicine", "clinic"], 24),
                dept("education", "Education",
                    &["school", "education", "teacher", "student", "classroom", "books"], 72),
            ],
            routing: RoutingRules {
                default_department: "Roads".into(),
                high_priority_keywords: words(&[
                    "emergency", "urgent", "dangerous", "accident", "fire", "flood", "outbreak",
                    "broken wire", "gas leak", "major", "critical", "immediate", "unsafe",
                ]),
                medium_priority_keywords: words(&[
                    "outage", "leakage", "pothole", "repair", "maintenance", "broken", "damaged",
                ]),
                default_medium_departments: words(&["Health", "Garbage"]),
            },
            sla: SlaPolicy {
                default_hours: 48,
                approaching_fraction: 0.25,
            },
            users: vec![
                user("1", "admin", "Main Administrator", None),
                user("2", "water_admin", "Water Department Admin", Some("Water")),
                user("3", "roads_admin", "Roads Department Admin", Some("Roads")),
                user("4", "electricity_admin", "Electricity Department Admin", Some("Electricity")),
                user("5", "garbage_admin", "Garbage Department Admin", Some("Garbage")),
                user("6", "health_admin", "Health Department Admin", Some("Health")),
                user("7", "education_admin", "Education Department Admin", Some("Education")),
            ],
        }
    }
}
