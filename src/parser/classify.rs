//! Keyword and length heuristics for topic and difficulty tags.

use crate::models::{Difficulty, Topic};

const HARD_LENGTH: usize = 200;
const MEDIUM_LENGTH: usize = 100;
const MEDIUM_OPTION_COUNT: usize = 4;

/// Keywords that mark a question as belonging to a topic.
pub fn topic_keywords(topic: Topic) -> &'static [&'static str] {
    match topic {
        Topic::Security => &["security", "IAM", "encryption", "firewall", "VPC", "SSL", "TLS"],
        Topic::Storage => &["S3", "EBS", "storage", "bucket", "volume", "snapshot"],
        Topic::Compute => &["EC2", "Lambda", "compute", "instance", "server", "container"],
        Topic::Database => &["RDS", "DynamoDB", "database", "SQL", "NoSQL"],
        Topic::Networking => &["VPC", "subnet", "route", "gateway", "load balancer", "CDN"],
        Topic::Monitoring => &["CloudWatch", "monitoring", "logs", "metrics", "alarms"],
        Topic::Management => &["billing", "cost", "support", "compliance", "governance"],
        Topic::General => &[],
    }
}

/// First topic, in declaration order, with a keyword in `text`.
pub fn classify_topic(text: &str) -> Topic {
    let lower = text.to_lowercase();
    Topic::ALL
        .into_iter()
        .find(|&topic| {
            topic_keywords(topic)
                .iter()
                .any(|keyword| lower.contains(&keyword.to_lowercase()))
        })
        .unwrap_or(Topic::General)
}

pub fn classify_difficulty(text: &str, option_count: usize) -> Difficulty {
    let length = text.chars().count();
    if length > HARD_LENGTH || text.contains("EXCEPT") || text.contains("NOT") {
        Difficulty::Hard
    } else if length > MEDIUM_LENGTH || option_count > MEDIUM_OPTION_COUNT {
        Difficulty::Medium
    } else {
        Difficulty::Easy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_keywords_case_insensitive() {
        assert_eq!(classify_topic("What is S3 used for?"), Topic::Storage);
        assert_eq!(classify_topic("Which EC2 purchase option..."), Topic::Compute);
        assert_eq!(classify_topic("Set a CLOUDWATCH alarm"), Topic::Monitoring);
        assert_eq!(classify_topic("Pick a dynamodb table design"), Topic::Database);
    }

    #[test]
    fn test_topic_first_match_wins() {
        // VPC is both a security and a networking keyword.
        assert_eq!(classify_topic("Configure a VPC with a public subnet"), Topic::Security);
        assert_eq!(classify_topic("Store snapshots on an EC2 instance"), Topic::Storage);
    }

    #[test]
    fn test_topic_defaults_to_general() {
        assert_eq!(classify_topic("Which pillar of the framework?"), Topic::General);
        assert_eq!(classify_topic(""), Topic::General);
    }

    #[test]
    fn test_difficulty_thresholds() {
        assert_eq!(classify_difficulty("Short question?", 3), Difficulty::Easy);
        assert_eq!(classify_difficulty(&"x".repeat(100), 4), Difficulty::Easy);
        assert_eq!(classify_difficulty(&"x".repeat(101), 4), Difficulty::Medium);
        assert_eq!(classify_difficulty("Short question?", 5), Difficulty::Medium);
        assert_eq!(classify_difficulty(&"x".repeat(200), 2), Difficulty::Medium);
        assert_eq!(classify_difficulty(&"x".repeat(201), 2), Difficulty::Hard);
    }

    #[test]
    fn test_difficulty_keywords_case_sensitive() {
        assert_eq!(classify_difficulty("All of these EXCEPT", 4), Difficulty::Hard);
        assert_eq!(classify_difficulty("Which is NOT valid?", 4), Difficulty::Hard);
        assert_eq!(classify_difficulty("Which is not valid?", 4), Difficulty::Easy);
    }

    #[test]
    fn test_difficulty_counts_characters() {
        let accented = "é".repeat(101);
        assert_eq!(classify_difficulty(&accented, 2), Difficulty::Medium);
        assert_eq!(classify_difficulty(&"é".repeat(60), 2), Difficulty::Easy);
    }

    #[test]
    fn test_difficulty_is_pure() {
        let text = "Which of the following is a managed NoSQL database?";
        assert_eq!(classify_difficulty(text, 4), classify_difficulty(text, 4));
    }
}
