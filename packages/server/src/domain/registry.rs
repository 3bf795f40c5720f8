//! Connection Registry trait 定義
//!
//! 「誰がオンラインか」の唯一の情報源に対するインターフェースです。
//! UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には
//! 依存しません（依存性の逆転）。
//!
//! ## 整合性
//!
//! 各メソッド呼び出しは他の呼び出しに対してアトミックであることが実装の
//! 要件です。`upsert` / `remove_by_connection` が roster の更新と snapshot の
//! 取得を1回の呼び出しで行うのはこのためです。更新と読み取りを別々の
//! 呼び出しに分けると、その間に別イベントの変更が割り込めてしまいます。

use async_trait::async_trait;

use super::entity::RosterEntry;
use super::value_object::{ConnectionId, RoomName};

/// Read-only copy of the roster, in first-join order.
pub type RosterSnapshot = Vec<RosterEntry>;

/// Authoritative mapping from live connection to user identity, plus the
/// derived online-user roster and room membership.
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// 参加者を追加または更新する（常に成功）
    ///
    /// 同じ `user_id` のエントリが存在すればその場で置き換え、なければ
    /// 末尾に追加します。更新後の roster を返します。
    async fn upsert(&self, entry: RosterEntry) -> RosterSnapshot;

    /// 現在その接続が所有しているエントリを削除する
    ///
    /// 一致するエントリがない場合（join していない、または再接続で
    /// 置き換え済み）は何も変更せず `None` を返します。いずれの場合も
    /// 呼び出し後の roster を返します。
    async fn remove_by_connection(
        &self,
        connection_id: &ConnectionId,
    ) -> (Option<RosterEntry>, RosterSnapshot);

    /// 現在の roster の読み取り専用コピーを取得する（副作用なし）
    async fn snapshot(&self) -> RosterSnapshot;

    /// 接続をルームに参加させる
    async fn join_room(&self, room: &RoomName, connection_id: ConnectionId);

    /// 接続をルームから退出させる
    async fn leave_room(&self, room: &RoomName, connection_id: &ConnectionId);

    /// ルームの現在のメンバー（接続 ID）を取得する
    async fn room_members(&self, room: &RoomName) -> Vec<ConnectionId>;

    /// オンラインユーザー数を取得する
    async fn count_online(&self) -> usize;
}
