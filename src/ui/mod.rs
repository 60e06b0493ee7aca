//! Terminal UI layer for interactive chat sessions.
//!
//! The UI module owns rendering, layout, keyboard input, and loop control
//! for the text user interface.
//!
//! Key submodules include:
//! - [`chat_loop`]: the main interaction loop that routes terminal events to
//!   [`crate::core::app`] and runs exchanges off the UI task.
//! - [`renderer`], [`messages`], [`sidebar`] and [`input`]: view composition
//!   and frame output.
//! - [`theme`]: color/style policy.
//!
//! Ownership boundary: this layer presents and captures interaction state, while
//! [`crate::core`] owns domain logic and backend coordination.

pub mod chat_loop;
pub mod input;
pub mod messages;
pub mod renderer;
pub mod sidebar;
pub mod theme;
