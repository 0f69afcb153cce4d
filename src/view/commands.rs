use crate::collection::BulkAction;

/// Effects a `ListView` asks its host to perform.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    None,
    RunBulkAction { action: BulkAction, ids: Vec<String> },
    RunItemAction { action: String, id: String },
    ShowMessage(String),
}
