//! Integration tests for the repository layer.
//!
//! Exercises the repositories against a real database to verify that:
//! - Recipe writes stamp a decodable short code and replace composition wholesale
//! - Collection adds are idempotent at the storage level, even when racing
//! - Cart lines feed the shopping-list aggregation unchanged
//! - List filters, subscriptions, revocation, and catalog import behave

use foodgram_core::catalog_import::{NewIngredient, NewTag};
use foodgram_core::collection::RecipeCollection;
use foodgram_core::recipe::IngredientAmount;
use foodgram_core::roles::ROLE_USER;
use foodgram_core::shopping_list::{aggregate, IngredientLine};
use foodgram_core::short_code::{ShortCodeCodec, DEFAULT_MIN_LENGTH};
use foodgram_core::types::DbId;
use foodgram_db::models::recipe::{RecipeFilter, RecipeInput};
use foodgram_db::models::user::CreateUser;
use foodgram_db::repositories::{
    IngredientRepo, RecipeCollectionRepo, RecipeIngredientRepo, RecipeRepo, RevokedTokenRepo,
    SubscriptionRepo, TagRepo, UserRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn codec() -> ShortCodeCodec {
    ShortCodeCodec::new("repository-tests", DEFAULT_MIN_LENGTH)
}

async fn create_user(pool: &PgPool, username: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            email: format!("{username}@example.com"),
            username: username.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role: ROLE_USER.to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn create_tag(pool: &PgPool, slug: &str) -> DbId {
    TagRepo::upsert(
        pool,
        &NewTag {
            name: slug.to_uppercase(),
            slug: slug.to_string(),
            color: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn create_ingredient(pool: &PgPool, name: &str, unit: &str) -> DbId {
    IngredientRepo::insert_many(
        pool,
        &[NewIngredient {
            name: name.to_string(),
            measurement_unit: unit.to_string(),
        }],
    )
    .await
    .unwrap();
    IngredientRepo::list(pool, Some(name))
        .await
        .unwrap()
        .into_iter()
        .find(|i| i.name == name && i.measurement_unit == unit)
        .unwrap()
        .id
}

fn input(name: &str, tag_ids: Vec<DbId>, ingredients: Vec<(DbId, i32)>) -> RecipeInput {
    RecipeInput {
        name: name.to_string(),
        text: "Cook it.".to_string(),
        image: Some("data:image/png;base64,AAAA".to_string()),
        cooking_time: 15,
        tag_ids,
        ingredients: ingredients
            .into_iter()
            .map(|(id, amount)| IngredientAmount { id, amount })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Recipes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_stamps_decodable_short_code(pool: PgPool) {
    let author = create_user(&pool, "author").await;
    let tag = create_tag(&pool, "lunch").await;
    let flour = create_ingredient(&pool, "flour", "g").await;
    let codec = codec();

    let id = RecipeRepo::create(&pool, author, &input("Bread", vec![tag], vec![(flour, 500)]), &codec)
        .await
        .unwrap();

    let recipe = RecipeRepo::find_by_id(&pool, id, None).await.unwrap().unwrap();
    let code = recipe.short_code.expect("short code must be set on create");
    assert_eq!(codec.decode_db_id(&code), Some(id));
    assert_eq!(RecipeRepo::find_id_by_short_code(&pool, &code).await.unwrap(), Some(id));
    assert!(!recipe.is_favorited);
    assert!(!recipe.is_in_shopping_cart);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ensure_short_code_never_overwrites(pool: PgPool) {
    let author = create_user(&pool, "alice").await;
    let id = RecipeRepo::create(&pool, author, &input("Soup", vec![], vec![]), &codec())
        .await
        .unwrap();
    let original = RecipeRepo::find_by_id(&pool, id, None).await.unwrap().unwrap().short_code;

    let kept = RecipeRepo::ensure_short_code(&pool, id, "replacement").await.unwrap();
    assert_eq!(kept, original);

    sqlx::query("UPDATE recipes SET short_code = NULL WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();
    let assigned = RecipeRepo::ensure_short_code(&pool, id, "fresh").await.unwrap();
    assert_eq!(assigned.as_deref(), Some("fresh"));
    assert_eq!(RecipeRepo::find_id_by_short_code(&pool, "fresh").await.unwrap(), Some(id));

    assert_eq!(RecipeRepo::ensure_short_code(&pool, id + 1000, "x").await.unwrap(), None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_replaces_composition_and_keeps_image(pool: PgPool) {
    let author = create_user(&pool, "author").await;
    let lunch = create_tag(&pool, "lunch").await;
    let dinner = create_tag(&pool, "dinner").await;
    let flour = create_ingredient(&pool, "flour", "g").await;
    let egg = create_ingredient(&pool, "egg", "pcs").await;

    let id = RecipeRepo::create(
        &pool,
        author,
        &input("Bread", vec![lunch], vec![(flour, 500)]),
        &codec(),
    )
    .await
    .unwrap();
    let code_before = RecipeRepo::find_by_id(&pool, id, None).await.unwrap().unwrap().short_code;

    let mut replacement = input("Omelette", vec![dinner], vec![(egg, 3)]);
    replacement.image = None;
    assert!(RecipeRepo::update(&pool, id, &replacement).await.unwrap());

    let recipe = RecipeRepo::find_by_id(&pool, id, None).await.unwrap().unwrap();
    assert_eq!(recipe.name, "Omelette");
    assert_eq!(recipe.image.as_deref(), Some("data:image/png;base64,AAAA"));
    assert_eq!(recipe.short_code, code_before);

    let tags = TagRepo::list_for_recipes(&pool, &[id]).await.unwrap();
    assert_eq!(tags.iter().map(|t| t.tag.id).collect::<Vec<_>>(), vec![dinner]);

    let lines = RecipeIngredientRepo::list_for_recipes(&pool, &[id]).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].ingredient.id, egg);
    assert_eq!(lines[0].ingredient.amount, 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_recipe_returns_false(pool: PgPool) {
    assert!(!RecipeRepo::update(&pool, 9999, &input("Ghost", vec![], vec![]))
        .await
        .unwrap());
    assert!(!RecipeRepo::delete(&pool, 9999).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters(pool: PgPool) {
    let alice = create_user(&pool, "alice").await;
    let bob = create_user(&pool, "bob").await;
    let lunch = create_tag(&pool, "lunch").await;
    let dinner = create_tag(&pool, "dinner").await;
    let salt = create_ingredient(&pool, "salt", "g").await;
    let codec = codec();

    let soup = RecipeRepo::create(&pool, alice, &input("Soup", vec![lunch], vec![(salt, 1)]), &codec)
        .await
        .unwrap();
    let stew = RecipeRepo::create(&pool, bob, &input("Stew", vec![dinner], vec![(salt, 2)]), &codec)
        .await
        .unwrap();
    RecipeCollectionRepo::add(&pool, RecipeCollection::Favorites, bob, soup)
        .await
        .unwrap();

    let all = RecipeRepo::list(&pool, None, &RecipeFilter::default(), 10, 0).await.unwrap();
    assert_eq!(all.iter().map(|r| r.id).collect::<Vec<_>>(), vec![stew, soup]);

    let by_author = RecipeFilter {
        author_id: Some(alice),
        ..Default::default()
    };
    let found = RecipeRepo::list(&pool, None, &by_author, 10, 0).await.unwrap();
    assert_eq!(found.iter().map(|r| r.id).collect::<Vec<_>>(), vec![soup]);

    let by_tags = RecipeFilter {
        tag_slugs: vec!["dinner".to_string(), "breakfast".to_string()],
        ..Default::default()
    };
    assert_eq!(RecipeRepo::count(&pool, None, &by_tags).await.unwrap(), 1);

    let favorited = RecipeFilter {
        favorited_only: true,
        ..Default::default()
    };
    let found = RecipeRepo::list(&pool, Some(bob), &favorited, 10, 0).await.unwrap();
    assert_eq!(found.len(), 1);
    assert!(found[0].is_favorited);
    // Anonymous viewers have no favorites.
    assert_eq!(RecipeRepo::count(&pool, None, &favorited).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_author_summaries_respect_limit(pool: PgPool) {
    let author = create_user(&pool, "author").await;
    let tag = create_tag(&pool, "lunch").await;
    let salt = create_ingredient(&pool, "salt", "g").await;
    let codec = codec();
    for name in ["One", "Two", "Three"] {
        RecipeRepo::create(&pool, author, &input(name, vec![tag], vec![(salt, 1)]), &codec)
            .await
            .unwrap();
    }

    let limited = RecipeRepo::list_summaries_by_author(&pool, author, Some(2)).await.unwrap();
    assert_eq!(limited.len(), 2);
    let all = RecipeRepo::list_summaries_by_author(&pool, author, None).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(RecipeRepo::count_by_author(&pool, author).await.unwrap(), 3);
}

// ---------------------------------------------------------------------------
// Collections and the shopping list
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_collection_add_remove(pool: PgPool) {
    let user = create_user(&pool, "cook").await;
    let tag = create_tag(&pool, "lunch").await;
    let salt = create_ingredient(&pool, "salt", "g").await;
    let recipe = RecipeRepo::create(&pool, user, &input("Soup", vec![tag], vec![(salt, 1)]), &codec())
        .await
        .unwrap();
    let cart = RecipeCollection::ShoppingCart;

    assert!(RecipeCollectionRepo::add(&pool, cart, user, recipe).await.unwrap());
    assert!(!RecipeCollectionRepo::add(&pool, cart, user, recipe).await.unwrap());
    assert!(RecipeCollectionRepo::contains(&pool, cart, user, recipe).await.unwrap());
    // The other collection is independent.
    assert!(!RecipeCollectionRepo::contains(&pool, RecipeCollection::Favorites, user, recipe)
        .await
        .unwrap());

    assert!(RecipeCollectionRepo::remove(&pool, cart, user, recipe).await.unwrap());
    assert!(!RecipeCollectionRepo::remove(&pool, cart, user, recipe).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_adds_insert_once(pool: PgPool) {
    let user = create_user(&pool, "racer").await;
    let tag = create_tag(&pool, "lunch").await;
    let salt = create_ingredient(&pool, "salt", "g").await;
    let recipe = RecipeRepo::create(&pool, user, &input("Soup", vec![tag], vec![(salt, 1)]), &codec())
        .await
        .unwrap();
    let fav = RecipeCollection::Favorites;

    let (a, b) = tokio::join!(
        RecipeCollectionRepo::add(&pool, fav, user, recipe),
        RecipeCollectionRepo::add(&pool, fav, user, recipe),
    );
    let successes = [a.unwrap(), b.unwrap()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM favorites WHERE user_id = $1")
        .bind(user)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cart_lines_aggregate_across_recipes(pool: PgPool) {
    let user = create_user(&pool, "shopper").await;
    let tag = create_tag(&pool, "baking").await;
    let flour = create_ingredient(&pool, "flour", "g").await;
    let egg = create_ingredient(&pool, "egg", "pcs").await;
    let codec = codec();

    let pancakes = RecipeRepo::create(
        &pool,
        user,
        &input("Pancakes", vec![tag], vec![(flour, 200), (egg, 2)]),
        &codec,
    )
    .await
    .unwrap();
    let bread = RecipeRepo::create(&pool, user, &input("Bread", vec![tag], vec![(flour, 300)]), &codec)
        .await
        .unwrap();
    for recipe in [pancakes, bread] {
        RecipeCollectionRepo::add(&pool, RecipeCollection::ShoppingCart, user, recipe)
            .await
            .unwrap();
    }

    let lines = RecipeIngredientRepo::list_cart_lines(&pool, user).await.unwrap();
    assert_eq!(lines.len(), 3);

    let items = aggregate(lines.into_iter().map(IngredientLine::from));
    let totals: Vec<(&str, &str, i64)> = items
        .iter()
        .map(|i| (i.name.as_str(), i.measurement_unit.as_str(), i.total))
        .collect();
    assert_eq!(totals, vec![("egg", "pcs", 2), ("flour", "g", 500)]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_empty_cart_has_no_lines(pool: PgPool) {
    let user = create_user(&pool, "nobody").await;
    let lines = RecipeIngredientRepo::list_cart_lines(&pool, user).await.unwrap();
    assert!(lines.is_empty());
}

// ---------------------------------------------------------------------------
// Users, subscriptions, tokens
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_subscriptions(pool: PgPool) {
    let reader = create_user(&pool, "reader").await;
    let author = create_user(&pool, "writer").await;

    assert!(SubscriptionRepo::add(&pool, reader, author).await.unwrap());
    assert!(!SubscriptionRepo::add(&pool, reader, author).await.unwrap());

    let authors = SubscriptionRepo::list_authors(&pool, reader, 10, 0).await.unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].id, author);
    assert!(authors[0].is_subscribed);
    assert_eq!(SubscriptionRepo::count_authors(&pool, reader).await.unwrap(), 1);

    let profile = UserRepo::find_profile(&pool, author, Some(reader)).await.unwrap().unwrap();
    assert!(profile.is_subscribed);
    let anonymous = UserRepo::find_profile(&pool, author, None).await.unwrap().unwrap();
    assert!(!anonymous.is_subscribed);

    assert!(SubscriptionRepo::remove(&pool, reader, author).await.unwrap());
    assert!(!SubscriptionRepo::remove(&pool, reader, author).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_self_subscription_violates_check(pool: PgPool) {
    let user = create_user(&pool, "narcissus").await;
    let result = SubscriptionRepo::add(&pool, user, user).await;
    assert!(result.is_err());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_token_revocation(pool: PgPool) {
    let user = create_user(&pool, "leaver").await;
    let expires = chrono::Utc::now() + chrono::Duration::minutes(5);

    assert!(!RevokedTokenRepo::is_revoked(&pool, "jti-1").await.unwrap());
    RevokedTokenRepo::revoke(&pool, "jti-1", user, expires).await.unwrap();
    RevokedTokenRepo::revoke(&pool, "jti-1", user, expires).await.unwrap();
    assert!(RevokedTokenRepo::is_revoked(&pool, "jti-1").await.unwrap());

    let stale = chrono::Utc::now() - chrono::Duration::minutes(5);
    RevokedTokenRepo::revoke(&pool, "jti-old", user, stale).await.unwrap();
    assert_eq!(RevokedTokenRepo::purge_expired(&pool).await.unwrap(), 1);
    assert!(RevokedTokenRepo::is_revoked(&pool, "jti-1").await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_lookup_and_avatar(pool: PgPool) {
    let id = create_user(&pool, "Painter").await;

    let by_email = UserRepo::find_by_email(&pool, "PAINTER@example.com").await.unwrap();
    assert_eq!(by_email.map(|u| u.id), Some(id));

    assert!(UserRepo::set_avatar(&pool, id, Some("https://cdn.example.com/a.png"))
        .await
        .unwrap());
    let user = UserRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(user.avatar.as_deref(), Some("https://cdn.example.com/a.png"));

    UserRepo::set_avatar(&pool, id, None).await.unwrap();
    let user = UserRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert!(user.avatar.is_none());
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ingredient_import_and_prefix_search(pool: PgPool) {
    let entries = vec![
        NewIngredient {
            name: "Sugar".to_string(),
            measurement_unit: "g".to_string(),
        },
        NewIngredient {
            name: "sugar syrup".to_string(),
            measurement_unit: "ml".to_string(),
        },
        NewIngredient {
            name: "salt".to_string(),
            measurement_unit: "g".to_string(),
        },
    ];
    assert_eq!(IngredientRepo::insert_many(&pool, &entries).await.unwrap(), 3);
    assert_eq!(IngredientRepo::insert_many(&pool, &entries).await.unwrap(), 0);

    let found = IngredientRepo::list(&pool, Some("SUG")).await.unwrap();
    assert_eq!(found.len(), 2);
    assert!(IngredientRepo::list(&pool, Some("%")).await.unwrap().is_empty());
    assert_eq!(IngredientRepo::list(&pool, None).await.unwrap().len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tag_upsert_by_slug(pool: PgPool) {
    let first = TagRepo::upsert(
        &pool,
        &NewTag {
            name: "Breakfast".to_string(),
            slug: "breakfast".to_string(),
            color: None,
        },
    )
    .await
    .unwrap();
    let second = TagRepo::upsert(
        &pool,
        &NewTag {
            name: "Morning".to_string(),
            slug: "breakfast".to_string(),
            color: Some("#E26C2D".to_string()),
        },
    )
    .await
    .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.name, "Morning");
    assert_eq!(TagRepo::list(&pool).await.unwrap().len(), 1);
    assert_eq!(
        TagRepo::find_existing_ids(&pool, &[first.id, first.id + 100]).await.unwrap(),
        vec![first.id]
    );
}
