// End-to-end tests for the cinema client session layer
//
// Each test starts its own stub backend (axum, bound to an ephemeral port)
// and a fresh ClientApp pointed at it, via test-context lifecycle hooks.
// The stub counts refresh exchanges and rejected requests so the tests can
// check how many round trips the client actually made.

mod test_session;
