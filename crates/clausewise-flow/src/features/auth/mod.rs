//! Login modal slice: sign-in, sign-up and their results.

mod update;

pub use update::{
    handle_login_result, handle_signup_result, submit_login, submit_signup, toggle_mode,
};
