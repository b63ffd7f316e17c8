//! The `jobfit init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("jobfit.toml").exists() {
        println!("jobfit.toml already exists, skipping.");
    } else {
        std::fs::write("jobfit.toml", SAMPLE_CONFIG)?;
        println!("Created jobfit.toml");
    }

    std::fs::create_dir_all("data")?;
    let dataset_path = Path::new("data/assessment_data.csv");
    if dataset_path.exists() {
        println!("data/assessment_data.csv already exists, skipping.");
    } else {
        std::fs::write(dataset_path, SAMPLE_DATASET)?;
        println!("Created data/assessment_data.csv");
    }

    println!("\nNext steps:");
    println!("  1. Run: jobfit validate");
    println!("  2. Run: jobfit take --role \"Data Analyst\"");
    println!("  3. Run: jobfit serve");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# jobfit configuration

dataset = "data/assessment_data.csv"

[server]
host = "127.0.0.1"
port = 5000

[assessment]
max_questions = 10
default_trust_score = 85.0
session_ttl_secs = 1800
sweep_interval_secs = 60

[predictor]
type = "linear"
skill_weight = 0.65
trust_weight = 0.35

# To score with a trained classifier instead:
# [predictor]
# type = "classifier"
# model_path = "${JOBFIT_HOME}/models/job_fit_classifier.json"
"#;

const SAMPLE_DATASET: &str = r#"Job_Role,Question,Options,Answer,Q_ID,Difficulty_Level
Data Analyst,Which SQL clause filters rows before grouping?,WHERE;HAVING;ORDER BY;LIMIT,WHERE,1,1
Data Analyst,Which chart best shows a trend over time?,Pie chart;Line chart;Scatter plot;Treemap,Line chart,2,1
Data Analyst,What does COUNT(*) return for an empty table?,NULL;0;1;An error,0,3,1
Data Analyst,Which measure is least affected by outliers?,Mean;Median;Range;Variance,Median,4,1
Data Analyst,Which SQL clause filters aggregated groups?,WHERE;HAVING;GROUP BY;DISTINCT,HAVING,5,2
Data Analyst,"Which join keeps every row from the left table, matched or not?",INNER JOIN;LEFT JOIN;CROSS JOIN;SELF JOIN,LEFT JOIN,6,2
Data Analyst,A p-value of 0.03 at alpha 0.05 means what?,Reject the null hypothesis;Accept the null hypothesis;The test is invalid;The effect is large,Reject the null hypothesis,7,2
Data Analyst,Which normal form removes transitive dependencies?,1NF;2NF;3NF;BCNF,3NF,8,2
Data Analyst,Which window function assigns the same rank to ties and skips the next rank?,ROW_NUMBER;RANK;DENSE_RANK;NTILE,RANK,9,3
Data Analyst,Simpson's paradox describes what?,A trend that reverses when groups are combined;A sampling bias;A type II error;Multicollinearity,A trend that reverses when groups are combined,10,3
Data Analyst,Which index type suits range queries on a sorted column?,Hash index;B-tree index;Bitmap index;Full-text index,B-tree index,11,3
Data Analyst,What does a correlation of -0.9 indicate?,Strong negative linear relationship;No relationship;Weak positive relationship;Causation,Strong negative linear relationship,12,3
Backend Developer,Which HTTP status code means Not Found?,200;301;404;500,404,13,1
Backend Developer,Which HTTP method is idempotent?,POST;PUT;PATCH;CONNECT,PUT,14,1
Backend Developer,What does JSON stand for?,JavaScript Object Notation;Java Serialized Object Network;Joined Schema Object Notation;JavaScript Online Names,JavaScript Object Notation,15,1
Backend Developer,Which data structure gives O(1) average lookup by key?,Linked list;Hash map;Binary heap;Stack,Hash map,16,1
Backend Developer,Which isolation level prevents dirty reads but allows non-repeatable reads?,Read uncommitted;Read committed;Repeatable read;Serializable,Read committed,17,2
Backend Developer,What is the main purpose of a database index?,Speed up lookups;Enforce backups;Compress rows;Encrypt columns,Speed up lookups,18,2
Backend Developer,Which header carries a bearer token?,Accept;Authorization;Content-Type;Cache-Control,Authorization,19,2
Backend Developer,What does a 409 status code signal?,Conflict with current state;Unauthorized;Rate limited;Server timeout,Conflict with current state,20,2
Backend Developer,"In the CAP theorem, what must a partitioned system trade off?",Consistency or availability;Latency or throughput;Security or speed;Cost or scale,Consistency or availability,21,3
Backend Developer,Which pattern stops retries from overwhelming a failing dependency?,Circuit breaker;Singleton;Observer;Adapter,Circuit breaker,22,3
Backend Developer,What guarantees exactly-once effects for a retried request?,Idempotency keys;Longer timeouts;Larger thread pools;Gzip compression,Idempotency keys,23,3
Backend Developer,Which consensus algorithm elects a leader with randomized timeouts?,Raft;Two-phase commit;Gossip;Paxos Commit,Raft,24,3
"#;
