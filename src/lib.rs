// Library root
// -----------
// This crate exposes a small library surface for two CLI tools. The
// binaries (`generate-image` and `post-ready`) use these modules to do
// their work; they share no runtime state, only the posts directory and
// the frontmatter `image:` convention.
//
// Module responsibilities:
// - `config`: Loads per-tool configuration (API keys, endpoints, posts
//   directory, request timeout) from the environment.
// - `frontmatter`: Parses and renders the delimited metadata header used
//   by post files.
// - `post`: The post record, its filename-encoded lifecycle state, and
//   the rename transition.
// - `runner`: Scans the posts directory and drives the per-file
//   submit-and-rename protocol.
// - `image`: Formats image-generation requests, decodes data-URI
//   responses, and derives output filenames.
// - `scheduler`: Talks to the post-scheduling service.
//
// Keeping this separation lets the submit protocol be exercised in tests
// without any HTTP, and keeps both HTTP integrations thin and swappable.
pub mod config;
pub mod frontmatter;
pub mod image;
pub mod post;
pub mod runner;
pub mod scheduler;
