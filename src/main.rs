// Thin delegating binary.
//
// The actual server assembly lives in `server::run`.
#[actix_rt::main]
async fn main() -> std::io::Result<()> {
    atrium_auth::server::run().await
}
