use biometrics::{Collector, Counter};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("nebula.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("nebula.client.request_errors");

pub(crate) static ROUTER_TEXT_REQUESTS: Counter = Counter::new("nebula.router.text_requests");
pub(crate) static ROUTER_IMAGE_REQUESTS: Counter = Counter::new("nebula.router.image_requests");

pub(crate) static CHAT_TURNS: Counter = Counter::new("nebula.chat.turns");
pub(crate) static CHAT_TURN_ERRORS: Counter = Counter::new("nebula.chat.turn_errors");

pub(crate) static RECOMMEND_REQUESTS: Counter = Counter::new("nebula.recommend.requests");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);

    collector.register_counter(&ROUTER_TEXT_REQUESTS);
    collector.register_counter(&ROUTER_IMAGE_REQUESTS);

    collector.register_counter(&CHAT_TURNS);
    collector.register_counter(&CHAT_TURN_ERRORS);

    collector.register_counter(&RECOMMEND_REQUESTS);
}
