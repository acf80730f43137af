//! Behavior: an immutable (requirement type, action) pair.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::{Action, RequirementType};

/// "What" combined with "how strictly".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Behavior {
    requirement_type: RequirementType,
    action: Action,
}

impl Behavior {
    pub const MUST_CALL: Behavior = Behavior::new(RequirementType::Must, Action::Call);
    pub const MUST_NOT_CALL: Behavior = Behavior::new(RequirementType::MustNot, Action::Call);
    pub const OPTIONALLY_CALL: Behavior = Behavior::new(RequirementType::Optionally, Action::Call);
    pub const MUST_INSTANTIATE: Behavior =
        Behavior::new(RequirementType::Must, Action::Instantiate);
    pub const MUST_NOT_INSTANTIATE: Behavior =
        Behavior::new(RequirementType::MustNot, Action::Instantiate);
    pub const MUST_ADD: Behavior = Behavior::new(RequirementType::Must, Action::Add);
    pub const MUST_DELETE: Behavior = Behavior::new(RequirementType::Must, Action::Delete);
    pub const MUST_MODIFY: Behavior = Behavior::new(RequirementType::Must, Action::Modify);
    pub const OPTIONALLY_MODIFY: Behavior =
        Behavior::new(RequirementType::Optionally, Action::Modify);
    pub const MUST_LEAVE_AS_IS: Behavior =
        Behavior::new(RequirementType::Must, Action::LeaveAsIs);

    pub const fn new(requirement_type: RequirementType, action: Action) -> Self {
        Self {
            requirement_type,
            action,
        }
    }

    pub fn requirement_type(&self) -> RequirementType {
        self.requirement_type
    }

    pub fn action(&self) -> Action {
        self.action
    }

    /// Whether this behavior only asks that the method stay untouched.
    pub fn is_leave_as_is(&self) -> bool {
        self.action == Action::LeaveAsIs
    }
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.requirement_type, self.action)
    }
}
