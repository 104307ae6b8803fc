mod model_loaders;

pub use model_loaders::{
    load_event_middleware, load_skill_middleware, load_skill_type_middleware,
    load_staff_middleware,
};
