pub mod daily_sync;
