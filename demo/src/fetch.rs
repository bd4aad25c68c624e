use crossbeam::channel::{bounded, Receiver};
use log::debug;

pub type FetchResult = Result<String, String>;

/// Posts a planning problem to the service on a worker thread; the single
/// response (body or error text) arrives on the returned channel.
pub fn post_planning_request(url: String, domain: String, problem: String) -> Receiver<FetchResult> {
    let (tx, rx) = bounded(1);
    std::thread::spawn(move || {
        debug!("requesting search tree from {url}");
        let result = ureq::post(&url)
            .send_form(&[("domain", domain.as_str()), ("problem", problem.as_str())])
            .map_err(|err| err.to_string())
            .and_then(|resp| resp.into_string().map_err(|err| err.to_string()));
        // The app may have been closed while the request was in flight.
        let _ = tx.send(result);
    });
    rx
}
