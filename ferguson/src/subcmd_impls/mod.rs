pub mod args;
mod check_result;
mod inspect_inputs;
mod rot_sweep;
mod utils;
