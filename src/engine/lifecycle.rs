use crate::core::{NodeError, NodeResult};
use serde::{Deserialize, Serialize};

/// Execution states of one node instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LifecycleState {
    #[default]
    Uninitialized,
    Initialized,
    /// The input rule returned true; the run for this cycle is due.
    Admitted,
    Executing,
}

impl LifecycleState {
    /// Check if transition from current state to target state is valid
    pub fn can_transition_to(&self, target: &LifecycleState) -> bool {
        use LifecycleState::*;

        matches!(
            (self, target),
            (Uninitialized, Initialized) |

            // Gated nodes
            (Initialized, Admitted) |
            (Admitted, Executing) |

            // Sources run without a gate
            (Initialized, Executing) |

            // Run finished, successfully or not
            (Executing, Initialized)
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Uninitialized => "Uninitialized",
            Self::Initialized => "Initialized",
            Self::Admitted => "Admitted",
            Self::Executing => "Executing",
        }
    }

    pub(crate) fn transition_to(&mut self, target: LifecycleState) -> NodeResult<()> {
        if !self.can_transition_to(&target) {
            return Err(NodeError::InvalidTransition {
                from: self.name().to_string(),
                to: target.name().to_string(),
            });
        }
        *self = target;
        Ok(())
    }
}
