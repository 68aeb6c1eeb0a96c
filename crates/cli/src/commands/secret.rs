//! Signing secret generation.

use secrecy::ExposeSecret;

/// Print a fresh random secret on stdout, ready for `JWT_SECRET=`.
pub fn generate() {
    let secret = srrobot_api::config::generate_secret();

    #[allow(clippy::print_stdout)]
    {
        println!("{}", secret.expose_secret());
    }
}
