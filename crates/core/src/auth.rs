//! Single-retry credential recovery.
//!
//! Both API clients funnel every request through [`with_refresh`], a
//! two-state machine (authorized / expired): the first auth-expiry error
//! triggers exactly one credential refresh and one retry of the original
//! request; a second consecutive expiry is promoted to a fatal error and
//! propagates. Retry amplification is therefore bounded at one extra
//! request per logical operation, and there is no recursion to blow up
//! on a persistently rejected credential.

/// Implemented by client error types that can signal credential expiry.
pub trait AuthRecovery {
    /// True for the recoverable "credential expired" error (HTTP 401).
    fn is_auth_expired(&self) -> bool;

    /// Promote a recoverable expiry into the fatal, non-retried form.
    /// Other errors pass through unchanged.
    fn into_fatal(self) -> Self;
}

/// Run `op` against `ctx`, refreshing credentials at most once.
///
/// `op` must be safe to repeat (all store and reader calls are: range
/// reads, range writes, clears, and page fetches address absolute
/// ranges). `refresh` mutates `ctx` with the new credential; its own
/// failure propagates untouched.
pub fn with_refresh<C, T, E>(
    ctx: &mut C,
    mut op: impl FnMut(&mut C) -> Result<T, E>,
    mut refresh: impl FnMut(&mut C) -> Result<(), E>,
) -> Result<T, E>
where
    E: AuthRecovery,
{
    match op(ctx) {
        Err(e) if e.is_auth_expired() => {
            refresh(ctx)?;
            op(ctx).map_err(|retry_err| {
                if retry_err.is_auth_expired() {
                    retry_err.into_fatal()
                } else {
                    retry_err
                }
            })
        }
        other => other,
    }
}
