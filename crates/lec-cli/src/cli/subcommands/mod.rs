mod clo;
mod material;
mod subject;
mod task;
mod topic;

pub use clo::CloCommands;
pub use material::MaterialCommands;
pub use subject::SubjectCommands;
pub use task::TaskCommands;
pub use topic::TopicCommands;
