//! Interaction core of the tabchat composer widget.
//!
//! The composer is a text input with three mutually exclusive surfaces
//! layered on top of it: a ranked suggestion dropdown for free text, an
//! `@`-triggered command menu, and a checkbox item list for the chosen
//! command. [`composer::Composer`] owns the surfaces, decides which one
//! receives each keystroke, and performs the document edits (trigger
//! rewrites and cleanup) when a command resolves. Rendering is external:
//! hosts listen for [`events::ComposerEvent`] and read state back through
//! accessors.

pub mod command;
pub mod command_menu;
pub mod composer;
pub mod editor;
pub mod events;
mod highlight;
pub mod pills;
pub mod providers;
pub mod suggestion_popup;
pub mod trigger;

pub use composer::Composer;
pub use composer::ComposerConfig;
pub use events::ComposerEvent;
