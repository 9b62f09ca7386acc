//! Decides whether a provider context supports spatial summarization at all.
//!
//! The policy is a static table; the workflows never branch on provider identity
//! anywhere else.

use crate::types::provider::{ProviderContext, Resolution};

struct PolicyEntry {
    provider: &'static str,
    network: &'static str,
    resolution: Resolution,
    dataset: &'static str,
}

const POLICY: &[PolicyEntry] = &[PolicyEntry {
    provider: "dwd",
    network: "observation",
    resolution: Resolution::Daily,
    dataset: "climate_summary",
}];

/// Outcome of the eligibility check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    /// Carries the diagnostic that the workflow logs once.
    Ineligible { reason: String },
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Eligibility::Eligible => None,
            Eligibility::Ineligible { reason } => Some(reason),
        }
    }
}

/// Looks `context` up in the policy table.
///
/// # Examples
///
/// ```
/// use meteo_spatial::{check_eligibility, ProviderContext, Resolution};
///
/// let daily = ProviderContext::dwd_observation(Resolution::Daily, "climate_summary");
/// assert!(check_eligibility(&daily).is_eligible());
///
/// let hourly = ProviderContext::dwd_observation(Resolution::Hourly, "temperature_air");
/// assert!(!check_eligibility(&hourly).is_eligible());
/// ```
pub fn check(context: &ProviderContext) -> Eligibility {
    let mut same_network = POLICY
        .iter()
        .filter(|entry| entry.provider == context.provider() && entry.network == context.network())
        .peekable();

    if same_network.peek().is_none() {
        return Eligibility::Ineligible {
            reason: format!(
                "Interpolation currently only works for DWD observation requests, got provider '{}' network '{}'",
                context.provider(),
                context.network()
            ),
        };
    }

    if same_network
        .any(|entry| entry.resolution == context.resolution() && entry.dataset == context.dataset())
    {
        return Eligibility::Eligible;
    }

    Eligibility::Ineligible {
        reason: format!(
            "Interpolation is not supported for DWD observation dataset '{}' at resolution '{}'",
            context.dataset(),
            context.resolution()
        ),
    }
}
