//! The closed set of per-file actions offered in the action menu.

use serde::{Deserialize, Serialize};

/// Every action a file row offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// Change the base name.
    Rename,
    /// Read-only information view.
    Details,
    /// Edit the reader list.
    Share,
    /// Fetch the blob directly.
    Download,
    /// Remove the record and its blob.
    Delete,
}

/// The subset of actions that commit a mutation after confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutatingAction {
    /// Rename commit.
    Rename,
    /// Reader-list commit.
    Share,
    /// Delete commit.
    Delete,
}

impl ActionKind {
    /// The mutating counterpart, if this action opens a confirmation dialog.
    pub fn mutating(self) -> Option<MutatingAction> {
        match self {
            Self::Rename => Some(MutatingAction::Rename),
            Self::Share => Some(MutatingAction::Share),
            Self::Delete => Some(MutatingAction::Delete),
            Self::Details | Self::Download => None,
        }
    }

    /// Static descriptor for this action.
    pub fn descriptor(self) -> &'static ActionDescriptor {
        match self {
            Self::Rename => &ACTION_DESCRIPTORS[0],
            Self::Details => &ACTION_DESCRIPTORS[1],
            Self::Share => &ACTION_DESCRIPTORS[2],
            Self::Download => &ACTION_DESCRIPTORS[3],
            Self::Delete => &ACTION_DESCRIPTORS[4],
        }
    }
}

impl std::fmt::Display for MutatingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rename => write!(f, "rename"),
            Self::Share => write!(f, "share"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Menu entry: action, label and icon reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionDescriptor {
    /// Action.
    pub kind: ActionKind,
    /// Menu label.
    pub label: &'static str,
    /// Icon asset path.
    pub icon: &'static str,
}

/// Actions in menu order.
pub const ACTION_DESCRIPTORS: [ActionDescriptor; 5] = [
    ActionDescriptor {
        kind: ActionKind::Rename,
        label: "Rename",
        icon: "/assets/icons/edit.svg",
    },
    ActionDescriptor {
        kind: ActionKind::Details,
        label: "Details",
        icon: "/assets/icons/info.svg",
    },
    ActionDescriptor {
        kind: ActionKind::Share,
        label: "Share",
        icon: "/assets/icons/share.svg",
    },
    ActionDescriptor {
        kind: ActionKind::Download,
        label: "Download",
        icon: "/assets/icons/download.svg",
    },
    ActionDescriptor {
        kind: ActionKind::Delete,
        label: "Delete",
        icon: "/assets/icons/delete.svg",
    },
];
