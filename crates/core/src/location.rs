//! Endpoints of an inventory movement.

use serde::{Deserialize, Serialize};

use crate::id::DistributorId;

/// One endpoint of an inventory transfer.
///
/// The label has exactly one warehouse and the outside world is a single
/// sink, so both are sentinel variants carrying no id; only distributors
/// are parameterized. Standard movement patterns:
///
/// ```text
/// Allocation  : Warehouse       → Distributor(id)
/// Sale        : Distributor(id) → External
/// Return      : Distributor(id) → Warehouse
/// TransferOut : Distributor(a)  → Warehouse
/// TransferIn  : Warehouse       → Distributor(b)
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum Location {
    /// The label's own warehouse stock. Not balance-checked: its outbound
    /// ceiling is the production run's manufactured quantity.
    Warehouse,
    /// An external distributor holding inventory on behalf of the label.
    Distributor(DistributorId),
    /// Outside the label's system entirely — sold to end customers or
    /// written off.
    External,
}

impl Location {
    pub fn is_distributor(&self) -> bool {
        matches!(self, Self::Distributor(_))
    }

    /// The distributor id, if this endpoint is a distributor.
    pub fn distributor_id(&self) -> Option<DistributorId> {
        match self {
            Self::Distributor(id) => Some(*id),
            _ => None,
        }
    }
}

impl core::fmt::Display for Location {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Warehouse => write!(f, "warehouse"),
            Self::Distributor(id) => write!(f, "distributor({id})"),
            Self::External => write!(f, "external"),
        }
    }
}
