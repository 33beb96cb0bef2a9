use std::collections::HashSet;

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};

/// A subscription tier and its price in whole rupees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub name: String,
    pub price: i64,
}

impl Plan {
    pub fn new(name: &str, price: i64) -> Self {
        Plan {
            name: name.to_string(),
            price,
        }
    }
}

/// Ordered, read-only table of the plans offered on the subscription page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanTable {
    plans: Vec<Plan>,
}

impl Default for PlanTable {
    fn default() -> Self {
        PlanTable {
            plans: vec![
                Plan::new("weekly", 449),
                Plan::new("monthly", 999),
                Plan::new("half-yearly", 2999),
                Plan::new("yearly", 3999),
                Plan::new("lifetime", 5999),
            ],
        }
    }
}

impl PlanTable {
    pub fn new(plans: Vec<Plan>) -> anyhow::Result<Self> {
        if plans.is_empty() {
            return Err(anyhow!("Plan table must contain at least one plan"));
        }

        let mut seen = HashSet::new();
        for plan in &plans {
            if plan.name.trim().is_empty() {
                return Err(anyhow!("Plan name must not be empty"));
            }
            if plan.price <= 0 {
                return Err(anyhow!(
                    "Plan `{}` must have a positive price, got {}",
                    plan.name,
                    plan.price
                ));
            }
            if !seen.insert(plan.name.as_str()) {
                return Err(anyhow!("Plan `{}` is defined more than once", plan.name));
            }
        }

        Ok(PlanTable { plans })
    }

    /// Loads a plan table from a YAML list of `{ name, price }` entries.
    pub async fn from_yaml_file(path: &str) -> anyhow::Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read plans file `{}`", path))?;
        let plans: Vec<Plan> = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid YAML in `{}`", path))?;
        let table = PlanTable::new(plans)?;
        log::debug!("Loaded plans from YAML file: {:#?}", table);
        Ok(table)
    }

    pub fn get(&self, name: &str) -> Option<&Plan> {
        self.plans.iter().find(|plan| plan.name == name)
    }

    pub fn price_of(&self, name: &str) -> Option<i64> {
        self.get(name).map(|plan| plan.price)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Plan> {
        self.plans.iter()
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_table_has_the_five_tiers_in_order() {
        let table = PlanTable::default();
        let names: Vec<&str> = table.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            ["weekly", "monthly", "half-yearly", "yearly", "lifetime"]
        );
        assert_eq!(table.price_of("monthly"), Some(999));
        assert_eq!(table.price_of("lifetime"), Some(5999));
        assert_eq!(table.price_of("daily"), None);
    }

    #[test]
    fn rejects_duplicate_and_non_positive_plans() {
        assert!(PlanTable::new(vec![]).is_err());
        assert!(PlanTable::new(vec![Plan::new("weekly", 0)]).is_err());
        assert!(PlanTable::new(vec![Plan::new(" ", 10)]).is_err());
        assert!(PlanTable::new(vec![Plan::new("weekly", 10), Plan::new("weekly", 20)]).is_err());
    }

    #[tokio::test]
    async fn loads_plans_from_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "- name: starter\n  price: 100\n- name: pro\n  price: 250").unwrap();

        let table = PlanTable::from_yaml_file(file.path().to_str().unwrap())
            .await
            .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.price_of("pro"), Some(250));
    }

    #[tokio::test]
    async fn missing_yaml_file_is_an_error() {
        let err = PlanTable::from_yaml_file("/definitely/not/here/plans.yaml")
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read plans file"));
    }
}
