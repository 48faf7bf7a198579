pub mod browsers;
pub mod completion;
pub mod history;
pub mod serve;
