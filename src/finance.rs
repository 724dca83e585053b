use std::collections::HashMap;

use serde::Serialize;

use crate::model::{AssignedProvider, Project, Provider};

/// Provider spend against budget for one project.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Financials {
    pub total_cost: f64,
    /// Budget minus provider spend; negative when over budget.
    pub margin: f64,
    /// Spend as a percentage of budget, 0 for a zero budget.
    pub utilization: f64,
}

impl Financials {
    pub fn margin_is_negative(&self) -> bool {
        self.margin < 0.0
    }
}

pub fn aggregate(project: &Project) -> Financials {
    let total_cost: f64 = project
        .assigned_providers
        .iter()
        .map(|assigned| assigned.cost)
        .sum();
    let margin = project.budget - total_cost;
    let utilization = if project.budget > 0.0 {
        (total_cost / project.budget) * 100.0
    } else {
        0.0
    };
    Financials {
        total_cost,
        margin,
        utilization,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCost {
    pub provider_id: String,
    /// Provider name, or the raw id when the provider no longer exists.
    pub name: String,
    pub cost: f64,
}

pub fn provider_breakdown(project: &Project, providers: &[Provider]) -> Vec<ProviderCost> {
    project
        .assigned_providers
        .iter()
        .map(|assigned| {
            let name = providers
                .iter()
                .find(|provider| provider.id == assigned.provider_id)
                .map(|provider| provider.name.clone())
                .unwrap_or_else(|| assigned.provider_id.clone());
            ProviderCost {
                provider_id: assigned.provider_id.clone(),
                name,
                cost: assigned.cost,
            }
        })
        .collect()
}

/// Bookings for the providers picked in the project form, in pick order.
/// Providers with no entered cost are booked at 0.
pub fn assign_providers(
    provider_ids: &[String],
    costs: &HashMap<String, f64>,
) -> Vec<AssignedProvider> {
    let mut seen = Vec::with_capacity(provider_ids.len());
    for id in provider_ids {
        if seen.iter().any(|assigned: &AssignedProvider| &assigned.provider_id == id) {
            continue;
        }
        let cost = costs.get(id).copied().unwrap_or(0.0);
        seen.push(AssignedProvider::new(id.clone(), cost));
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(budget: f64, costs: &[f64]) -> Project {
        let mut project = Project::new("Obra", "cli-1", budget);
        project.assigned_providers = costs
            .iter()
            .enumerate()
            .map(|(i, cost)| AssignedProvider::new(format!("prov-{i}"), *cost))
            .collect();
        project
    }

    #[test]
    fn aggregates_spend_margin_and_utilization() {
        let financials = aggregate(&project(500_000.0, &[150_000.0]));
        assert_eq!(financials.total_cost, 150_000.0);
        assert_eq!(financials.margin, 350_000.0);
        assert_eq!(financials.utilization, 30.0);
        assert!(!financials.margin_is_negative());
    }

    #[test]
    fn zero_budget_means_zero_utilization() {
        let financials = aggregate(&project(0.0, &[]));
        assert_eq!(financials.utilization, 0.0);
        assert_eq!(financials.margin, 0.0);

        let spent = aggregate(&project(0.0, &[1_000.0]));
        assert_eq!(spent.utilization, 0.0);
        assert!(spent.margin_is_negative());
    }

    #[test]
    fn over_budget_margin_is_not_clamped() {
        let financials = aggregate(&project(1_200_000.0, &[300_000.0, 450_000.0, 600_000.0]));
        assert_eq!(financials.total_cost, 1_350_000.0);
        assert_eq!(financials.margin, -150_000.0);
        assert!(financials.utilization > 100.0);
    }

    #[test]
    fn utilization_divides_before_scaling() {
        assert_eq!(aggregate(&project(3.0, &[1.0])).utilization, 33.33333333333333);
        assert_eq!(aggregate(&project(1e308, &[1e307])).utilization, 10.0);
    }

    #[test]
    fn aggregation_is_repeatable() {
        let p = project(750_000.0, &[100_000.0, 25_000.0]);
        assert_eq!(aggregate(&p), aggregate(&p));
    }

    #[test]
    fn breakdown_names_known_providers() {
        let providers = vec![Provider {
            id: "prov-0".to_string(),
            name: "Cementos Fortaleza".to_string(),
            contact: String::new(),
            phone: String::new(),
            discount: "10%".to_string(),
            specialization: String::new(),
        }];
        let breakdown = provider_breakdown(&project(1.0, &[5.0, 7.0]), &providers);
        assert_eq!(breakdown[0].name, "Cementos Fortaleza");
        assert_eq!(breakdown[1].name, "prov-1");
        assert_eq!(breakdown[1].cost, 7.0);
    }

    #[test]
    fn unpriced_assignments_cost_zero() {
        let ids = vec!["prov-2".to_string(), "prov-1".to_string(), "prov-2".to_string()];
        let costs = HashMap::from([("prov-1".to_string(), 300_000.0)]);
        let assigned = assign_providers(&ids, &costs);
        assert_eq!(
            assigned,
            vec![
                AssignedProvider::new("prov-2", 0.0),
                AssignedProvider::new("prov-1", 300_000.0),
            ]
        );
    }
}
