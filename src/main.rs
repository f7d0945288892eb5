//! Builds composite SMuFL glyphs in a UFO font from hand-drawn parents.

use smufl_builder::core;

fn main() {
    let result = core::platform::get_cli_args().and_then(core::runner::run_app);
    if let Err(error) = result {
        core::platform::handle_error(error);
    }
}
