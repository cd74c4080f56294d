pub mod audit;
pub mod clo;
pub mod dispatch;
pub mod material;
pub mod sanitize;
pub mod shared;
pub mod stats;
pub mod subject;
pub mod task;
pub mod topic;
