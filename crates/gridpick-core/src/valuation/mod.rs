// Valuation engine: positional scarcity, bye-week conflicts, composite value.

pub mod analysis;
pub mod bye_week;
pub mod scarcity;
