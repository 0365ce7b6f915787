use std::cell::Cell;
use std::rc::Rc;
use std::sync::Barrier;
use std::thread;

use slugline_engine as sl;
use sl::*;
use uuid::Uuid;

/// Entity whose candidates are `[name, [name, city]]`.
struct Restaurant(Record);

impl Restaurant {
    fn new(name: &str, city: &str) -> Self {
        Restaurant(Record::new("restaurant").with("name", name).with("city", city))
    }
}

impl SlugHost for Restaurant {
    fn entity_type(&self) -> &str {
        self.0.entity_type()
    }

    fn id(&self) -> Option<Uuid> {
        self.0.id()
    }

    fn read_attribute(&self, name: &str) -> anyhow::Result<Option<String>> {
        self.0.read_attribute(name)
    }

    fn write_attribute(&mut self, name: &str, value: Option<String>) -> anyhow::Result<()> {
        self.0.write_attribute(name, value)
    }

    fn slug_candidates(&self, config: &SlugConfig) -> CandidateSpec<Self> {
        CandidateSpec::new()
            .reference(config.candidate_source.clone())
            .references([config.candidate_source.clone(), "city".to_string()])
    }
}

/// Entity whose only candidates are blank literals.
struct Blank(Record);

impl SlugHost for Blank {
    fn entity_type(&self) -> &str {
        self.0.entity_type()
    }

    fn id(&self) -> Option<Uuid> {
        self.0.id()
    }

    fn read_attribute(&self, name: &str) -> anyhow::Result<Option<String>> {
        self.0.read_attribute(name)
    }

    fn write_attribute(&mut self, name: &str, value: Option<String>) -> anyhow::Result<()> {
        self.0.write_attribute(name, value)
    }

    fn slug_candidates(&self, _config: &SlugConfig) -> CandidateSpec<Self> {
        CandidateSpec::new().literal("").literal("   ").literal("\t")
    }
}

#[test]
fn single_candidate_in_empty_scope() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let slugger = Slugger::new(SlugConfig::default(), &store)?;
    let mut car = Record::new("car").with("name", "Peugot 206");

    store.save(&slugger, &mut car)?;
    assert_eq!(car.get("slug"), Some("peugot-206"));
    Ok(())
}

#[test]
fn second_identical_candidate_gets_token_suffix() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let slugger = Slugger::new(SlugConfig::default(), &store)?;

    let mut first = Record::new("car").with("name", "Peugot 206");
    let mut second = Record::new("car").with("name", "Peugot 206");
    store.save(&slugger, &mut first)?;
    store.save(&slugger, &mut second)?;

    assert_eq!(first.get("slug"), Some("peugot-206"));
    let slug = second.get("slug").expect("second slug written");
    let token = slug.strip_prefix("peugot-206-").expect("token appended to first candidate");
    assert_eq!(Uuid::parse_str(token)?.get_version_num(), 4);
    Ok(())
}

#[test]
fn composite_candidate_used_when_first_is_taken() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let slugger = Slugger::new(SlugConfig::default(), &store)?;
    let scope = Scope::new("restaurant");

    let mut new_paltz = Restaurant::new("Plaza Diner", "New Paltz");
    let slug = slugger.before_save(&mut new_paltz)?.expect("gate open");
    assert_eq!(slug, "plaza-diner");
    store.persist(&scope, Uuid::new_v4(), &slug)?;

    let mut kingston = Restaurant::new("Plaza Diner", "Kingston");
    let slug = slugger.before_save(&mut kingston)?.expect("gate open");
    assert_eq!(slug, "plaza-diner-kingston");
    assert_eq!(kingston.0.get("slug"), Some("plaza-diner-kingston"));
    Ok(())
}

#[test]
fn scoped_slugs_only_collide_within_their_partition() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let slugger = Slugger::new(SlugConfig::default().with_scope_field("city"), &store)?;

    let mut new_paltz = Record::new("restaurant").with("name", "Plaza Diner").with("city", "New Paltz");
    let mut kingston = Record::new("restaurant").with("name", "Plaza Diner").with("city", "Kingston");
    store.save(&slugger, &mut new_paltz)?;
    store.save(&slugger, &mut kingston)?;

    assert_eq!(new_paltz.get("slug"), Some("plaza-diner"));
    assert_eq!(kingston.get("slug"), Some("plaza-diner"));
    Ok(())
}

#[test]
fn stored_slug_is_write_once_until_cleared() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let slugger = Slugger::new(SlugConfig::default(), &store)?;
    let mut diner = Record::new("restaurant").with("name", "Joes Diner");
    store.save(&slugger, &mut diner)?;
    assert_eq!(diner.get("slug"), Some("joes-diner"));

    diner.set("name", "Something Else");
    assert_eq!(slugger.before_save(&mut diner)?, None);
    store.save(&slugger, &mut diner)?;
    assert_eq!(diner.get("slug"), Some("joes-diner"));

    diner.clear("slug");
    diner.set("name", "The Plaza Diner");
    store.save(&slugger, &mut diner)?;
    assert_eq!(diner.get("slug"), Some("the-plaza-diner"));

    let scope = Scope::new("restaurant");
    let id = diner.id().expect("saved record has an id");
    assert_eq!(store.slug_of(&scope, id)?.as_deref(), Some("the-plaza-diner"));
    assert!(!store.exists(&scope, "joes-diner", None)?);
    Ok(())
}

#[test]
fn regenerating_own_slug_is_not_a_conflict() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let slugger = Slugger::new(SlugConfig::default(), &store)?;
    let mut diner = Record::new("restaurant").with("name", "Joes Diner");
    store.save(&slugger, &mut diner)?;

    diner.clear("slug");
    store.save(&slugger, &mut diner)?;
    assert_eq!(diner.get("slug"), Some("joes-diner"));
    Ok(())
}

#[test]
fn blank_candidates_are_unresolvable_and_nothing_is_written() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let slugger = Slugger::new(SlugConfig::default(), &store)?;
    let mut host = Blank(Record::new("car").with("name", "Peugot 206"));

    assert!(slugger.should_generate(&host)?);
    let err = slugger.before_save(&mut host).unwrap_err();
    assert!(matches!(err, SlugError::UnresolvableInput { .. }));
    assert!(!err.is_retryable());
    assert_eq!(host.0.get("slug"), None);
    assert!(store.is_empty(&Scope::new("car"))?);
    Ok(())
}

#[test]
fn later_candidates_are_never_invoked_when_first_is_free() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let slugger = Slugger::new(SlugConfig::default(), &store)?;
    let car = Record::new("car").with("name", "Peugot 206");

    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let spec = CandidateSpec::new().reference("name").with(Candidate::lazy(move || {
        counter.set(counter.get() + 1);
        "Peugot 206 Expensive"
    }));

    assert_eq!(slugger.generate(&car, &spec)?, "peugot-206");
    assert_eq!(calls.get(), 0);

    store.seed(&Scope::new("car"), "peugot-206")?;
    assert_eq!(slugger.generate(&car, &spec)?, "peugot-206-expensive");
    assert_eq!(calls.get(), 1);
    Ok(())
}

#[test]
fn swapping_candidates_swaps_the_winner() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let slugger = Slugger::new(SlugConfig::default(), &store)?;
    let car = Record::new("car").with("name", "Mini").with("model", "Cooper");

    let forward = CandidateSpec::new().reference("name").reference("model");
    let backward = CandidateSpec::new().reference("model").reference("name");
    assert_eq!(slugger.generate(&car, &forward)?, "mini");
    assert_eq!(slugger.generate(&car, &backward)?, "cooper");
    Ok(())
}

#[test]
fn racing_writers_get_one_winner_and_a_retryable_conflict() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let slugger = Slugger::new(SlugConfig::default(), &store)?;
    let scope = Scope::new("car");
    let barrier = Barrier::new(2);

    let writer = || -> Result<String, SlugError> {
        let mut record = Record::new("car").with("name", "Peugot 206");
        let slug = slugger.before_save(&mut record)?.expect("gate open");
        // both writers have checked before either writes
        barrier.wait();
        store.persist(&scope, Uuid::new_v4(), &slug)?;
        Ok(slug)
    };
    let outcomes: Vec<Result<String, SlugError>> = thread::scope(|s| {
        let handles: Vec<_> = (0..2).map(|_| s.spawn(writer)).collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("writer thread panicked"))
            .collect()
    });

    let winners: Vec<_> = outcomes.iter().filter_map(|outcome| outcome.as_ref().ok()).collect();
    assert_eq!(winners, vec!["peugot-206"]);
    let losers: Vec<_> = outcomes.iter().filter_map(|outcome| outcome.as_ref().err()).collect();
    assert_eq!(losers.len(), 1);
    assert!(losers[0].is_retryable());

    // retry: clear the slug and run the hook again
    let mut retry = Record::new("car").with("name", "Peugot 206");
    store.save(&slugger, &mut retry)?;
    assert!(retry.get("slug").is_some_and(|slug| slug.starts_with("peugot-206-")));
    assert_eq!(store.len(&scope)?, 2);
    Ok(())
}

#[test]
fn concurrent_saves_with_retry_never_duplicate() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let slugger = Slugger::new(SlugConfig::default(), &store)?;

    let writer = || -> Result<String, SlugError> {
        let mut record = Record::new("car").with("name", "Peugot 206");
        loop {
            match store.save(&slugger, &mut record) {
                Ok(_) => break,
                Err(err) if err.is_retryable() => record.clear("slug"),
                Err(err) => return Err(err),
            }
        }
        Ok(record.get("slug").unwrap_or_default().to_string())
    };
    let slugs: Vec<String> = thread::scope(|s| {
        let handles: Vec<_> = (0..8).map(|_| s.spawn(writer)).collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("writer thread panicked"))
            .collect::<Result<_, _>>()
    })?;

    let unique: std::collections::HashSet<_> = slugs.iter().collect();
    assert_eq!(unique.len(), 8);
    assert_eq!(slugs.iter().filter(|slug| *slug == "peugot-206").count(), 1);
    assert_eq!(store.len(&Scope::new("car"))?, 8);
    Ok(())
}

#[test]
fn config_file_drives_generation() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("slugs.toml");
    std::fs::write(
        &path,
        "[defaults]\nsequence_separator = \"_\"\nlocale = \"de\"\n\n[entities.street]\ncandidate_source = \"title\"\n",
    )?;

    let config = sl::config::load_entity_config(&path, "street")?;
    let store = MemoryStore::new();
    let slugger = Slugger::new(config, &store)?;
    let mut street = Record::new("street").with("title", "Müller Straße");
    store.save(&slugger, &mut street)?;
    assert_eq!(street.get("slug"), Some("mueller_strasse"));
    Ok(())
}

#[test]
fn fallback_stays_within_max_length() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let scope = Scope::new("car");
    store.seed(&scope, "peugot-206-coupe")?;
    let slugger = Slugger::new(SlugConfig::default().with_max_length(40), &store)?;

    let mut coupe = Record::new("car").with("name", "Peugot 206 Coupe");
    store.save(&slugger, &mut coupe)?;
    let slug = coupe.get("slug").expect("slug written");
    assert_eq!(slug.len(), 40);
    let token = slug.strip_prefix("peu-").expect("first candidate cut to fit");
    assert_eq!(Uuid::parse_str(token)?.get_version_num(), 4);

    store.seed(&scope, "peugot-206")?;
    let tight = Slugger::new(SlugConfig::default().with_max_length(20), &store)?;
    let mut car = Record::new("car").with("name", "Peugot 206");
    store.save(&tight, &mut car)?;
    let slug = car.get("slug").expect("slug written");
    assert!(slug.len() <= 20, "{slug} is over the limit");
    assert_ne!(slug, "peugot-206");
    Ok(())
}
