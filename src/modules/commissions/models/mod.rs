pub mod commission;

pub use commission::{CommissionBearing, CommissionSplit, SalesTotals};
