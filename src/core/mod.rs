pub mod auth;
pub mod git;
pub mod remote;
