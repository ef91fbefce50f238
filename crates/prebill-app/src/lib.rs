// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod expanded;
pub mod filters;
pub mod forms;
pub mod ids;
pub mod model;
pub mod pipeline;
pub mod state;

pub use expanded::*;
pub use filters::*;
pub use forms::*;
pub use ids::*;
pub use model::*;
pub use pipeline::*;
pub use state::*;
