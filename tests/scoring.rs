use tf_idf_recommender::{
    Corpus, DefaultIdfEngine, GeoPoint, IdfEngine, InteractionKind, Item, ItemRepository,
    ItemVector, MemoryItemRepository, MemoryLedger, RecommendError, Recommender,
    RecommenderConfig, UserId, WhitespaceTokenizer,
};

type TestRecommender = Recommender<MemoryItemRepository<u32>, MemoryLedger<u32>, Corpus<u32>>;

fn recommender(items: Vec<Item<u32>>) -> TestRecommender {
    let mut recommender = Recommender::new(
        items.into_iter().collect(),
        MemoryLedger::new(),
        Corpus::new(),
        WhitespaceTokenizer,
        RecommenderConfig::default(),
    )
    .unwrap();
    recommender.force_recalculate().unwrap();
    recommender
}

/// E1..E3 from the term-only scenario plus an item sharing no words
fn term_only() -> TestRecommender {
    recommender(vec![
        Item::new(1, "concert jazz", ""),
        Item::new(2, "concert rock", ""),
        Item::new(3, "jazz festival", ""),
        Item::new(4, "opera ballet", ""),
    ])
}

fn full_item(key: u32) -> Item<u32> {
    Item::new(key, "Harbour jazz night", "Live jazz by the water")
        .with_tags(&["Jazz", "Live"])
        .with_categories(&["Music"])
        .hosted_by("alice")
        .located_at(GeoPoint::new(-33.8568, 151.2153))
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn shared_words_score_positive() {
    let r = term_only();
    assert!(r.similarity(&1, &3).unwrap() > 0.0);
    assert!(r.similarity(&1, &2).unwrap() > 0.0);
    assert_eq!(r.similarity(&1, &4).unwrap(), 0.0);
}

#[test]
fn term_only_similarity_is_weighted_cosine() {
    let r = term_only();
    let v = r.similarity_vector(&1, &3).unwrap();
    // nothing but the term column is populated
    assert_eq!(&v.as_array()[1..], &[0.0, 0.0, 0.0, 0.0]);
    let expected = v[0] * r.weight_vector()[0];
    assert!(approx(r.similarity(&1, &3).unwrap(), expected));
}

#[test]
fn self_similarity_is_exactly_one() {
    let r = recommender(vec![full_item(1), Item::new(2, "empty", "")]);
    assert_eq!(r.similarity(&1, &1).unwrap(), 1.0);
    assert_eq!(r.similarity(&2, &2).unwrap(), 1.0);
}

#[test]
fn similarity_is_symmetric() {
    let r = recommender(vec![
        full_item(1),
        Item::new(2, "Rock by the water", "Loud night")
            .with_tags(&["live", "Outdoor"])
            .with_categories(&["Music", "Festival"])
            .hosted_by("bob")
            .located_at(GeoPoint::new(-37.8210, 144.9690)),
        Item::new(3, "Pottery workshop", "Bring your own clay").with_tags(&["Kids"]),
    ]);
    for (a, b) in [(1, 2), (1, 3), (2, 3)] {
        assert_eq!(r.similarity(&a, &b).unwrap(), r.similarity(&b, &a).unwrap());
    }
}

#[test]
fn identical_co_located_items_match_on_every_column() {
    let r = recommender(vec![
        full_item(1),
        full_item(2),
        Item::new(3, "Farmers market", "Fresh bread").with_tags(&["Food"]),
    ]);
    let v = r.similarity_vector(&1, &2).unwrap();
    // term, tag, category and distance are unit matches
    for column in [0, 1, 2, 4] {
        assert!(approx(v[column], 1.0), "got {:?}", v);
    }
    // host keeps its idf: alice hosts 2 of 3 items
    let host_idf = DefaultIdfEngine::idf(2, 3);
    assert!(approx(v[3], host_idf * host_idf), "got {:?}", v);

    let w = r.weight_vector();
    let expected = w[0] + w[1] + w[2] + w[3] * host_idf * host_idf + w[4];
    assert!(approx(r.similarity(&1, &2).unwrap(), expected));
}

#[test]
fn weight_vector_is_unit_length() {
    let r = term_only();
    assert!(approx(r.weight_vector().length(), 1.0));
}

#[test]
fn rare_shared_host_outweighs_prolific_one() {
    // alice hosts 2 of 8 items, bob hosts 6 of 8
    let mut items = vec![
        Item::new(1, "quiz night", "").hosted_by("alice"),
        Item::new(2, "quiz night", "").hosted_by("alice"),
    ];
    items.extend((3..=8).map(|key| Item::new(key, "quiz night", "").hosted_by("bob")));
    let r = recommender(items);

    let rare = r.similarity_vector(&1, &2).unwrap()[3];
    let prolific = r.similarity_vector(&3, &4).unwrap()[3];
    assert!(approx(rare, DefaultIdfEngine::idf(2, 8).powi(2)));
    assert!(approx(prolific, DefaultIdfEngine::idf(6, 8).powi(2)));
    assert!(rare > prolific);
    assert!(r.similarity(&1, &2).unwrap() > r.similarity(&3, &4).unwrap());
}

#[test]
fn unknown_location_contributes_nothing() {
    let r = recommender(vec![
        Item::new(1, "jazz", "").located_at(GeoPoint::new(0.0, 0.0)),
        Item::new(2, "jazz", ""),
    ]);
    assert_eq!(r.similarity_vector(&1, &2).unwrap()[4], 0.0);
}

#[test]
fn shared_host_raises_similarity() {
    let r = recommender(vec![
        Item::new(1, "quiz night", "").hosted_by("alice"),
        Item::new(2, "quiz night", "").hosted_by("alice"),
        Item::new(3, "quiz night", "").hosted_by("bob"),
    ]);
    assert!(r.similarity(&1, &2).unwrap() > r.similarity(&1, &3).unwrap());
}

#[test]
fn tags_and_categories_ignore_case() {
    let r = recommender(vec![
        Item::new(1, "a", "").with_tags(&["Jazz"]).with_categories(&["MUSIC"]),
        Item::new(2, "b", "").with_tags(&["jazz "]).with_categories(&["music"]),
    ]);
    let v = r.similarity_vector(&1, &2).unwrap();
    assert!(approx(v[1], 1.0));
    assert!(approx(v[2], 1.0));
}

#[test]
fn unknown_item_is_an_error() {
    let r = term_only();
    assert!(matches!(r.similarity(&1, &42), Err(RecommendError::UnknownItem(_))));
    assert!(matches!(
        r.user_score(&42, &ItemVector::identity()),
        Err(RecommendError::UnknownItem(_))
    ));
}

#[test]
fn empty_profile_scores_zero() {
    let r = recommender(vec![full_item(1), full_item(2)]);
    let profile = r.build_user_profile(&UserId::from("nobody")).unwrap();
    assert!(profile.is_identity());
    assert_eq!(profile, ItemVector::identity());
    for key in [1, 2] {
        assert_eq!(r.user_score(&key, &profile).unwrap(), 0.0);
    }
}

#[test]
fn profile_follows_interactions() {
    let mut r = term_only();
    let user = UserId::from("carol");
    r.record_interaction(&user, &1, InteractionKind::View).unwrap();

    let profile = r.build_user_profile(&user).unwrap();
    assert!(!profile.is_identity());
    let own = r.user_score(&1, &profile).unwrap();
    let jazz = r.user_score(&3, &profile).unwrap();
    let rock = r.user_score(&2, &profile).unwrap();
    let opera = r.user_score(&4, &profile).unwrap();
    assert!(own > jazz && own > rock);
    assert!(jazz > 0.0 && rock > 0.0);
    assert_eq!(opera, 0.0);
}

#[test]
fn purchase_outweighs_view() {
    let mut r = term_only();
    let user = UserId::from("dave");
    r.record_interaction(&user, &2, InteractionKind::View).unwrap();
    r.record_interaction(&user, &3, InteractionKind::Purchase).unwrap();
    let profile = r.build_user_profile(&user).unwrap();
    assert!(r.user_score(&3, &profile).unwrap() > r.user_score(&2, &profile).unwrap());
}

#[test]
fn ratings_scale_reviews() {
    let mut r = term_only();
    let user = UserId::from("erin");
    r.record_rating(&user, &2, 1.0).unwrap();
    r.record_rating(&user, &3, 5.0).unwrap();
    let profile = r.build_user_profile(&user).unwrap();
    assert!(r.user_score(&3, &profile).unwrap() > r.user_score(&2, &profile).unwrap());
}

#[test]
fn interactions_with_removed_items_are_skipped() {
    let mut r = term_only();
    let user = UserId::from("frank");
    r.record_interaction(&user, &99, InteractionKind::View).unwrap();
    assert!(r.build_user_profile(&user).unwrap().is_identity());
}

#[test]
#[should_panic(expected = "use record_rating")]
fn record_interaction_rejects_reviews() {
    let mut r = term_only();
    let _ = r.record_interaction(&UserId::from("gina"), &1, InteractionKind::Review);
}

#[test]
fn blended_score_averages_both_signals() {
    let mut r = term_only();
    let user = UserId::from("hana");
    r.record_interaction(&user, &2, InteractionKind::Comment).unwrap();
    let profile = r.build_user_profile(&user).unwrap();

    let blended = r.blended_score(&3, &1, &profile).unwrap();
    let expected = 0.5 * r.similarity(&3, &1).unwrap() + 0.5 * r.user_score(&3, &profile).unwrap();
    assert_eq!(blended, expected);
}

#[test]
fn force_recalculate_is_idempotent() {
    let mut r = recommender(vec![full_item(1), full_item(2), Item::new(3, "concert rock", "")]);
    let corpus = r.corpus().clone();
    let score = r.similarity(&1, &3).unwrap();

    r.force_recalculate().unwrap();
    assert_eq!(r.corpus(), &corpus);
    assert_eq!(r.similarity(&1, &3).unwrap(), score);
}

#[test]
fn rebuild_picks_up_catalog_changes() {
    let mut r = term_only();
    assert_eq!(r.similarity(&1, &4).unwrap(), 0.0);

    r.items_mut().upsert(Item::new(4, "jazz opera", ""));
    // stale until rebuilt
    assert_eq!(r.similarity(&1, &4).unwrap(), 0.0);
    r.force_recalculate().unwrap();
    assert!(r.similarity(&1, &4).unwrap() > 0.0);

    r.items_mut().remove(&3);
    r.force_recalculate().unwrap();
    assert_eq!(r.corpus().doc_num(), 3);
    assert_eq!(r.corpus().get_doc_freq("festival"), 0);
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = RecommenderConfig::default();
    config.weights.distance = f64::NAN;
    let result = Recommender::new(
        MemoryItemRepository::<u32>::new(),
        MemoryLedger::<u32>::new(),
        Corpus::<u32>::new(),
        WhitespaceTokenizer,
        config,
    );
    assert!(matches!(result, Err(RecommendError::InvalidConfig(_))));
}

struct BrokenRepository;

impl ItemRepository for BrokenRepository {
    type Key = u32;

    fn live_items(&self) -> tf_idf_recommender::Result<Vec<Item<u32>>> {
        Err(RecommendError::Collaborator("catalog offline".into()))
    }

    fn item(&self, _key: &u32) -> tf_idf_recommender::Result<Option<Item<u32>>> {
        Err(RecommendError::Collaborator("catalog offline".into()))
    }

    fn host_item_count(&self, _host: &UserId) -> tf_idf_recommender::Result<u64> {
        Ok(0)
    }
}

#[test]
fn collaborator_errors_propagate() {
    let mut r = Recommender::new(
        BrokenRepository,
        MemoryLedger::<u32>::new(),
        Corpus::<u32>::new(),
        WhitespaceTokenizer,
        RecommenderConfig::default(),
    )
    .unwrap();
    let err = r.force_recalculate().unwrap_err();
    assert_eq!(err.to_string(), "catalog offline");
    assert!(matches!(r.similarity(&1, &2), Err(RecommendError::Collaborator(_))));
}
