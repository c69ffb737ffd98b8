//! TCP accept loop and worker pool. Workers are plain OS threads pulling
//! connections off a shared queue, mirroring the gen-server-style thread
//! bookkeeping used elsewhere in this codebase, stripped to what an HTTP
//! handler needs: no per-thread mailbox, just a shared work queue and a
//! join on shutdown.

use std::io::{self, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use log::{debug, info};

use crate::error::Error;
use crate::http;
use crate::store::UserStore;

pub struct Server {
    workers: Vec<thread::JoinHandle<()>>,
    stop: Arc<AtomicBool>,
    wake_port: u16,
}

impl Server {
    /// Bind `addr` and spawn `worker_count` worker threads sharing `store`.
    /// Returns once the listener is bound; accepting runs on a dedicated
    /// thread so the caller can install a signal handler afterwards.
    pub fn start(addr: &str, worker_count: usize, store: Arc<UserStore>) -> io::Result<Server> {
        let listener = TcpListener::bind(addr)?;
        let wake_port = listener.local_addr()?.port();
        info!("listening on {}", addr);

        let stop = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel::<TcpStream>();
        let rx = Arc::new(Mutex::new(rx));

        let mut workers = Vec::with_capacity(worker_count + 1);
        for id in 0..worker_count {
            let rx = Arc::clone(&rx);
            let store = Arc::clone(&store);
            workers.push(thread::spawn(move || worker_loop(id, rx, store)));
        }

        let accept_stop = Arc::clone(&stop);
        workers.push(thread::spawn(move || accept_loop(listener, tx, accept_stop)));

        Ok(Server {
            workers,
            stop,
            wake_port,
        })
    }

    /// Stop accepting new connections, let every in-flight handler run to
    /// completion, and join every worker thread before returning.
    ///
    /// `listener.incoming()` blocks in `accept()`, so the stop flag alone
    /// cannot wake it up: one throwaway connection to our own listening
    /// port is opened to unblock it, at which point `accept_loop` observes
    /// the flag and exits without dispatching that connection to a worker.
    /// Dropping its `Sender` then lets every `worker_loop` drain its
    /// in-flight connection and exit on the next empty `recv`.
    pub fn shutdown(self) {
        self.stop.store(true, Ordering::SeqCst);
        let _ = TcpStream::connect(("127.0.0.1", self.wake_port));
        for worker in self.workers {
            let _ = worker.join();
        }
    }
}

fn accept_loop(listener: TcpListener, tx: mpsc::Sender<TcpStream>, stop: Arc<AtomicBool>) {
    for stream in listener.incoming() {
        if stop.load(Ordering::SeqCst) {
            break;
        }
        match stream {
            Ok(stream) => {
                if tx.send(stream).is_err() {
                    break;
                }
            }
            Err(err) => debug!("accept error: {}", err),
        }
    }
}

fn worker_loop(id: usize, rx: Arc<Mutex<mpsc::Receiver<TcpStream>>>, store: Arc<UserStore>) {
    loop {
        let stream = {
            let rx = rx.lock().unwrap();
            rx.recv()
        };
        match stream {
            Ok(stream) => serve_connection(stream, &store),
            Err(_) => break,
        }
    }
    debug!("worker {} exiting", id);
}

fn serve_connection(stream: TcpStream, store: &UserStore) {
    let mut reader = match stream.try_clone() {
        Ok(clone) => BufReader::new(clone),
        Err(err) => {
            log_transport_error(err);
            return;
        }
    };
    let request = match http::Request::read(&mut reader) {
        Some(request) => request,
        None => {
            debug!("malformed request line, dropping connection");
            return;
        }
    };

    let response = http::handle(store, &request);
    let mut stream = stream;
    if let Err(err) = stream.write_all(&response.into_bytes()) {
        log_transport_error(err);
    }
}

/// Socket I/O failures are surfaced as [`Error::TransportError`] and logged
/// at `debug` — expected and frequent under normal client disconnects, not
/// actionable. The connection is simply closed; no response is sent.
fn log_transport_error(err: io::Error) {
    debug!("{}", Error::TransportError(err.to_string()));
}
