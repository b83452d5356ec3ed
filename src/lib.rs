pub mod dom;
pub mod render;
pub mod search;

// Extension glue: transport wire types and the persisted query history.
pub mod history;
pub mod message;

pub mod net;
