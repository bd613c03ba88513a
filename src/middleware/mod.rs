pub mod session;

pub use session::{session_gate, Session, SessionGate};
