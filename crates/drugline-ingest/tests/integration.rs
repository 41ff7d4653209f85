//! End-to-end tests for the file-backed pipeline

use std::path::Path;

use drugline_core::{ProgressContext, RetryPolicy};
use drugline_ingest::{Config, run_journals, run_mentions};
use serde_json::{Value, json};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &[u8]) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join(name), content).unwrap();
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn config(root: &Path) -> Config {
    Config {
        bronze_dir: root.join("bronze"),
        silver_dir: root.join("silver"),
        gold_dir: root.join("gold"),
        retry: RetryPolicy::none(),
        ..Default::default()
    }
}

fn seed_bronze(bronze: &Path) {
    write(
        bronze,
        "drugs.csv",
        b"atccode,drug\nA04AD,DIPHENHYDRAMINE\nR01AD,BETAMETHASONE\nV03AB,ETHANOL\n",
    );
    write(
        bronze,
        "clinical_trials.csv",
        b"id,scientific_title,date,journal\n\
          NCT01967433,Use of Diphenhydramine as an Adjunctive Sedative,1 January 2020,Journal of emergency nursing\n\
          NCT04188184,Tranexamic Acid Versus Epinephrine,27 April 2020\n",
    );
    write(
        bronze,
        "pubmed.csv",
        b"id,title,date,journal\n\
          1,A 44-year-old man with erythema of the face diphenhydramine,01/01/2019,Journal of emergency nursing\n\
          2,An evaluation of benadryl,01/01/2019,Journal of emergency nursing\n",
    );
    // trailing commas, as found in real exports
    write(
        bronze,
        "pubmed.json",
        br#"[
  {"id": 9, "title": "Gold nanoparticles synthesized from Euphorbia fischeriana root by green route method alleviates the isoprenaline hydrochloride induced myocardial infarction in rats.", "date": "01/01/2020", "journal": "Journal of photochemistry and photobiology. B, Biology"},
  {"id": 10, "title": "Clinical implications of umbilical artery Doppler changes after betamethasone administration", "date": "01/01/2020", "journal": "The journal of maternal-fetal & neonatal medicine",},
  {"id": "", "title": "Ethanol toxicity", "date": "2020-01-01", "journal": "Psychopharmacology"},
]"#,
    );
    write(bronze, "README.csv", b"what,why\nx,y\n");
}

#[test]
fn mention_pipeline_end_to_end() {
    let root = TempDir::new().unwrap();
    let config = config(root.path());
    seed_bronze(&config.bronze_dir);

    let summary = run_mentions(&config, &ProgressContext::with_tty(false)).unwrap();
    assert_eq!(summary.source_files, 5);
    assert_eq!(summary.skipped_files, 1);
    assert_eq!(summary.drugs_mentioned, 2);

    let stats: Vec<(&str, usize, usize)> = summary
        .tables
        .iter()
        .map(|s| (s.table.as_str(), s.valid, s.invalid))
        .collect();
    assert_eq!(
        stats,
        vec![("clinical_trials", 1, 1), ("drugs", 3, 0), ("pubmed", 4, 1)]
    );

    let mentions = read_json(&summary.output);
    assert_eq!(
        mentions,
        json!([
            {
                "drug": "A04AD",
                "clinical_trials": [{"id": "NCT01967433", "date": "1 January 2020"}],
                "pubmed": [{"id": 1, "date": "01/01/2019"}],
                "journal": [
                    {"name": "Journal of emergency nursing", "date": "1 January 2020"},
                    {"name": "Journal of emergency nursing", "date": "01/01/2019"},
                ],
            },
            {
                "drug": "R01AD",
                "clinical_trials": [],
                "pubmed": [{"id": 10, "date": "01/01/2020"}],
                "journal": [
                    {"name": "The journal of maternal-fetal & neonatal medicine", "date": "01/01/2020"},
                ],
            },
        ])
    );

    // silver layer keeps both partitions per table
    let trials_invalid = read_json(&config.invalid_path("clinical_trials"));
    assert_eq!(trials_invalid[0]["row"]["id"], "NCT04188184");
    assert_eq!(
        trials_invalid[0]["error"],
        "Incorrect type for column 'journal'. Expected string, found null."
    );
    let pubmed_invalid = read_json(&config.invalid_path("pubmed"));
    assert_eq!(pubmed_invalid[0]["row"]["title"], "Ethanol toxicity");
    assert_eq!(
        pubmed_invalid[0]["error"],
        "Incorrect type for column 'id'. Expected integer, found string."
    );
    assert_eq!(read_json(&config.table_path("drugs")).as_array().unwrap().len(), 3);
}

#[test]
fn journal_ranking_from_gold_mentions() {
    let root = TempDir::new().unwrap();
    let config = config(root.path());
    seed_bronze(&config.bronze_dir);
    run_mentions(&config, &ProgressContext::with_tty(false)).unwrap();

    let summary = run_journals(&config).unwrap();
    assert_eq!(summary.mentions, 2);
    let ranking = summary.ranking.unwrap();
    assert_eq!(ranking.name, "Journal of emergency nursing");
    assert_eq!(ranking.drug_count, 1);

    // tie between the two venues with one drug each: smallest name wins
    assert_eq!(
        read_json(summary.output.as_deref().unwrap()),
        json!({
            "name": "Journal of emergency nursing",
            "drug_count": 1,
            "drugs": ["A04AD"],
        })
    );
}

#[test]
fn journal_ranking_without_mentions_is_no_data() {
    let root = TempDir::new().unwrap();
    let config = config(root.path());
    write(&config.gold_dir, "drug_mentions.json", b"[]");

    let summary = run_journals(&config).unwrap();
    assert!(summary.ranking.is_none());
    assert!(summary.output.is_none());
    assert!(!config.journals_path().exists());
}

#[test]
fn explicit_sources_override_discovery() {
    let root = TempDir::new().unwrap();
    let mut config = config(root.path());
    seed_bronze(&config.bronze_dir);
    config.sources = Some(vec![
        config.bronze_dir.join("drugs.csv"),
        config.bronze_dir.join("pubmed.json"),
    ]);
    config.publication_tables = vec!["pubmed".into()];

    let summary = run_mentions(&config, &ProgressContext::with_tty(false)).unwrap();
    assert_eq!(summary.source_files, 2);
    assert_eq!(summary.drugs_mentioned, 1);

    let mentions = read_json(&summary.output);
    assert!(mentions[0].get("clinical_trials").is_none());
}

#[test]
fn missing_bronze_directory_fails() {
    let root = TempDir::new().unwrap();
    let config = config(root.path());
    let err = run_mentions(&config, &ProgressContext::with_tty(false)).unwrap_err();
    assert!(err.to_string().contains("directory does not exist"));
}

#[test]
fn latin1_csv_is_decoded() {
    let root = TempDir::new().unwrap();
    let config = config(root.path());
    write(&config.bronze_dir, "drugs.csv", b"atccode,drug\nN02BA,ASPIRIN\n");
    write(
        &config.bronze_dir,
        "pubmed.csv",
        b"id,title,date,journal\n1,Aspirin caf\xE9 study,2020,Revue m\xE9dicale\n",
    );

    run_mentions(&config, &ProgressContext::with_tty(false)).unwrap();
    let mentions = read_json(&config.mentions_path());
    assert_eq!(mentions[0]["journal"][0]["name"], "Revue médicale");
}

#[test]
fn stale_ranking_is_removed_when_there_is_no_data() {
    let root = TempDir::new().unwrap();
    let config = config(root.path());
    write(&config.gold_dir, "drug_mentions.json", b"[]");
    write(
        &config.gold_dir,
        "journal_analysis.json",
        br#"{"name": "Old Journal", "drug_count": 9, "drugs": []}"#,
    );

    let summary = run_journals(&config).unwrap();
    assert!(summary.ranking.is_none());
    assert!(!config.journals_path().exists());
}

#[test]
fn ranking_skips_badly_shaped_mention_entries() {
    let root = TempDir::new().unwrap();
    let config = config(root.path());
    write(
        &config.gold_dir,
        "drug_mentions.json",
        br#"[
  {"drug": "A1", "source": "v2", "pubmed": [{"id": 1, "date": "d"}],
   "journal": [{"name": null, "date": "d"}, {"name": "J2", "date": "d"}]},
  {"drug": "B2", "journal": [{"name": "J1", "date": null}, {"date": "d"}]},
  {"drug": "C3", "journal": [{"name": "J2", "date": "d"}]}
]"#,
    );

    let ranking = run_journals(&config).unwrap().ranking.unwrap();
    assert_eq!(ranking.name, "J2");
    assert_eq!(ranking.drugs, vec!["A1", "C3"]);
}

#[test]
fn repeated_publication_table_is_searched_once() {
    let root = TempDir::new().unwrap();
    let mut config = config(root.path());
    seed_bronze(&config.bronze_dir);
    config.publication_tables = vec!["pubmed".into(), "pubmed".into()];

    let summary = run_mentions(&config, &ProgressContext::with_tty(false)).unwrap();
    let text = std::fs::read_to_string(&summary.output).unwrap();
    let pubmed_keys: Vec<&str> = text.lines().filter(|l| l.contains("\"pubmed\"")).collect();
    assert_eq!(pubmed_keys.len(), summary.drugs_mentioned);

    let mentions = read_json(&summary.output);
    assert_eq!(mentions[0]["pubmed"], json!([{"id": 1, "date": "01/01/2019"}]));
}
