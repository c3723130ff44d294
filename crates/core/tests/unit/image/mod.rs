//! Image-side tests.

mod border;
