//! Names shared by the resolution passes.

/// The implicit self-reference of a component instance.
pub const THIS: &str = "this";

/// Key of the props object inside a destructured component parameter.
pub const PROPS: &str = "props";

/// Key under which a component's view function is reached by callers.
pub const VIEW: &str = "view";

/// Key under which a component's view-model function is reached by callers.
pub const VIEW_MODEL: &str = "viewModel";
