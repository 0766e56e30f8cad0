pub mod mail_worker;

pub use mail_worker::MailWorker;
