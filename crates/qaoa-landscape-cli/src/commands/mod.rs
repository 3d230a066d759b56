pub mod clusters;
pub mod compare;
pub mod landscape;
pub mod maxcut;
pub mod warm_starts;
