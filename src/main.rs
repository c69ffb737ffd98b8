use std::sync::Arc;

use structopt::StructOpt;

use rankd::config::Opt;
use rankd::server::Server;
use rankd::store::UserStore;

fn main() {
    let opt = Opt::from_args();
    env_logger::Builder::new().filter_level(opt.log_level()).init();

    let store = Arc::new(UserStore::new());
    let workers = opt.workers();
    let addr = format!("0.0.0.0:{}", opt.port);

    let server = match Server::start(&addr, workers, Arc::clone(&store)) {
        Ok(server) => server,
        Err(err) => {
            eprintln!("failed to start server on {}: {}", addr, err);
            std::process::exit(1);
        }
    };

    let (tx, rx) = std::sync::mpsc::channel();
    ctrlc::set_handler(move || {
        let _ = tx.send(());
    })
    .expect("failed to install SIGINT handler");
    rx.recv().expect("signal channel closed unexpectedly");

    println!("Bye!");
    server.shutdown();
    std::process::exit(0);
}
