use na_sources::NewsAggregator;

pub struct AppState {
    pub aggregator: NewsAggregator,
}

impl AppState {
    pub fn new(aggregator: NewsAggregator) -> Self {
        Self { aggregator }
    }
}
