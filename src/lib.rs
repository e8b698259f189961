// Library root
// ------------
// `up` copies local files to a web server with rsync and prints the public
// URL of each one. The binary (`main.rs`) only wires these modules
// together.
//
// Module responsibilities:
// - `cli`: command-line arguments.
// - `config`: locating, parsing and validating `config.toml`.
// - `name`: base32 encoding and the per-run remote directory name.
// - `slug`: turning local file names into safe remote names.
// - `transfer`: the `Transferer` seam and the rsync implementation.
// - `output`: URL and error lines for the user.
// - `upload`: the per-file loop tying everything together.
pub mod cli;
pub mod config;
pub mod name;
pub mod output;
pub mod slug;
pub mod transfer;
pub mod upload;
