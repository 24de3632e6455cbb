//! Markup rendering of bookmark trees and the index of rendered nodes.

pub mod html;
pub mod index;
pub mod markup;
pub mod renderer;
