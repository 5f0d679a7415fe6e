//! Collection endpoints of the dashboard and what each of them supports.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::controller::ListSettings;
use crate::domain::types::TypeConstraintError;
use crate::models::config::DeskConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Customers,
    Tickets,
    TrashedTickets,
    Tasks,
    Invoices,
    Payments,
    Products,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::Customers,
        ResourceKind::Tickets,
        ResourceKind::TrashedTickets,
        ResourceKind::Tasks,
        ResourceKind::Invoices,
        ResourceKind::Payments,
        ResourceKind::Products,
    ];

    pub fn endpoint(self) -> &'static str {
        match self {
            ResourceKind::Customers => "customers-with-tickets",
            ResourceKind::Tickets => "tickets",
            ResourceKind::TrashedTickets => "tickets/trashed",
            ResourceKind::Tasks => "tasks",
            ResourceKind::Invoices => "invoices",
            ResourceKind::Payments => "payments",
            ResourceKind::Products => "products",
        }
    }

    pub fn filter_keys(self) -> &'static [&'static str] {
        match self {
            ResourceKind::Customers | ResourceKind::TrashedTickets => &[],
            ResourceKind::Tickets => &["status", "customer_id", "agent_id", "priority"],
            ResourceKind::Tasks => &["status", "agent_id"],
            ResourceKind::Invoices => &["status", "customer_id", "start_date", "end_date"],
            ResourceKind::Payments => &["customer_id", "start_date", "end_date"],
            ResourceKind::Products => &["category"],
        }
    }

    pub fn sortable(self) -> bool {
        matches!(
            self,
            ResourceKind::Tickets | ResourceKind::Invoices | ResourceKind::Products
        )
    }

    /// Controller settings with the dashboard defaults.
    pub fn settings(self) -> Result<ListSettings, TypeConstraintError> {
        Ok(ListSettings::new(self.endpoint())?
            .with_filters(self.filter_keys())?
            .sortable(self.sortable()))
    }

    /// Controller settings with page sizes and debounce taken from `config`.
    pub fn settings_for(self, config: &DeskConfig) -> Result<ListSettings, TypeConstraintError> {
        self.settings()?.with_config(config)
    }

    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::Customers => "customers",
            ResourceKind::Tickets => "tickets",
            ResourceKind::TrashedTickets => "trashed-tickets",
            ResourceKind::Tasks => "tasks",
            ResourceKind::Invoices => "invoices",
            ResourceKind::Payments => "payments",
            ResourceKind::Products => "products",
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResourceKind {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or(TypeConstraintError::InvalidValue(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_builds_settings() {
        for kind in ResourceKind::ALL {
            let settings = kind.settings().unwrap();
            assert_eq!(settings.endpoint, kind.endpoint());
            assert_eq!(settings.filter_keys.len(), kind.filter_keys().len());
        }
    }

    #[test]
    fn names_round_trip() {
        for kind in ResourceKind::ALL {
            assert_eq!(kind.name().parse::<ResourceKind>(), Ok(kind));
        }
        assert!("reports".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn config_overrides_page_sizes() {
        let mut config = DeskConfig::new("https://desk.example.com/api");
        config.per_page_options = vec![20, 40];
        config.default_per_page = 20;

        let settings = ResourceKind::Payments.settings_for(&config).unwrap();

        assert_eq!(settings.default_per_page.get(), 20);
        assert!(settings.page_size(10).is_none());
        assert!(settings.page_size(40).is_some());
    }
}
