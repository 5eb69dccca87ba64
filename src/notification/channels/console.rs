//! 控制台渠道 - dry-run 时把通知打印到 stdout

use crate::error::Result;
use crate::notification::channel::NotificationChannel;

#[derive(Debug, Default)]
pub struct ConsoleChannel;

impl NotificationChannel for ConsoleChannel {
    fn name(&self) -> &str {
        "console"
    }

    fn send(&self, text: &str) -> Result<()> {
        println!("[notify] {}", text);
        Ok(())
    }
}
