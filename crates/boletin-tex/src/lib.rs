//! boletin-tex — LaTeX document generation.
//!
//! Pure string assembly: escaping, the bullet-detecting comment formatter,
//! shared document boilerplate, and the two report renderers. Nothing here
//! touches the filesystem or the LaTeX toolchain.

pub mod comments;
pub mod document;
pub mod escape;
pub mod grades;
pub mod testing;
