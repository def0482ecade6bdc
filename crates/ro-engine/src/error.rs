use ro_core::error::Error;

/// Registration error: the scope does not declare or inherit the function.
pub fn method_not_found(scope: impl Into<String>, function: impl Into<String>) -> Error {
    Error::MethodNotFound {
        scope: scope.into(),
        function: function.into(),
    }
}

/// Invocation-setup error naming the offending function.
pub fn invocation_setup_error(function: impl Into<String>, reason: impl Into<String>) -> Error {
    Error::InvocationSetup {
        function: function.into(),
        reason: reason.into(),
    }
}

/// Create a generic error (when we don't have specific error information)
pub fn generic_error(message: impl Into<eyre::Report>) -> Error {
    Error::from(message.into())
}
