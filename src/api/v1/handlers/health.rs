/*
 * Responsibility
 * - liveness 確認のみ (認証なし、依存なし)
 */
pub async fn health() -> &'static str {
    "ok"
}
