//! Demo provider for development without a live oracle.

use async_trait::async_trait;

use super::{OracleProvider, OracleReply};
use crate::Result;

/// Returns canned generated text so the full extraction and web workflow
/// can be exercised without oracle credentials.
#[derive(Debug, Default)]
pub struct DemoProvider;

impl DemoProvider {
    /// Create a demo provider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OracleProvider for DemoProvider {
    async fn retrieve_and_generate(&self, query: &str) -> Result<OracleReply> {
        let text = format!(
            "Here are health checkup packages matching \"{query}\":\n\
             \n\
             Hospital Name: Apollo Hospitals\n\
             Package Name: Comprehensive Health Check\n\
             Price: \u{20b9}4999\n\
             Description: Annual full-body screening for adults\n\
             - Complete blood count\n\
             - ECG\n\
             - Lipid profile\n\
             - Chest X-ray\n\
             \n\
             Hospital Name: Fortis Healthcare\n\
             Package Name: Essential Checkup\n\
             Price: \u{20b9}2499\n\
             Description: Basic preventive screening\n\
             - Blood sugar (fasting)\n\
             - Urine routine\n\
             - Blood pressure evaluation\n"
        );

        Ok(OracleReply::Generated(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_reply_extracts_into_records() {
        let reply = DemoProvider::new()
            .retrieve_and_generate("full body checkup")
            .await
            .unwrap();

        let OracleReply::Generated(text) = reply else {
            panic!("demo provider should return generated text");
        };

        let packages = carefind_core::extract(&text).unwrap();
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].hospital, "Apollo Hospitals");
        assert_eq!(packages[0].price, "4999");
        assert_eq!(packages[1].hospital, "Fortis Healthcare");
        assert_eq!(packages[1].features.len(), 3);
    }
}
