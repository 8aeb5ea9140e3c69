use crate::data::Batch;

#[derive(Debug)]
pub struct BatchState {
    pub batch_rx: crossbeam_channel::Receiver<Box<Batch>>,
}

#[derive(Debug)]
pub struct FeedState {
    pub batch_tx: crossbeam_channel::Sender<Box<Batch>>,
}
