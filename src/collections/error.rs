pub type DequeResult<T> = Result<T, DequeError>;

/// Errors reported by the checked (`try_*`) operations of the deques.
///
/// The unchecked operations treat the same conditions as contract
/// violations and panic with this error's message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DequeError {
    /// the operation needs at least one element
    Empty { operation: &'static str },
}

impl core::fmt::Display for DequeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DequeError::Empty { operation } => {
                write!(f, "`{operation}` called on an empty deque")
            }
        }
    }
}

#[cfg(not(feature = "no-std"))]
impl std::error::Error for DequeError {}

/// unwrap the result of a checked operation, treating an error as a
/// violated precondition of the unchecked operation
#[track_caller]
pub(crate) fn contract<T>(result: DequeResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => panic!("contract violation: {e}"),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_error_names_the_operation() {
        let e = DequeError::Empty {
            operation: "remove_front",
        };
        assert_eq!(
            format!("{e}"),
            "`remove_front` called on an empty deque"
        );
    }

    #[test]
    fn contract_passes_through_ok_values() {
        assert_eq!(contract(Ok::<_, DequeError>(5)), 5);
    }

    #[test]
    #[should_panic(expected = "contract violation: `front` called on an empty deque")]
    fn contract_panics_on_errors() {
        contract::<u32>(Err(DequeError::Empty { operation: "front" }));
    }
}
