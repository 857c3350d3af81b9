use crate::models::{Avatar, AvatarCategory, AvatarPart, AvatarPartType, Award, User};
use crate::rules::Rules;

/// Whether the balance covers the part's price.
pub fn is_affordable(part: &AvatarPart, rules: &Rules, balance: Award) -> bool {
    rules.price_of(part).coin <= balance.coin
}

/// A copy of `avatar` with the slot for `part_type` switched to the given
/// category and index. The other two slots are untouched. If no slot
/// matches the avatar comes back unchanged.
pub fn apply_selection(
    avatar: &Avatar,
    part_type: AvatarPartType,
    category: AvatarCategory,
    index: u8,
) -> Avatar {
    let mut new_avatar = *avatar;
    for slot in new_avatar.parts.iter_mut() {
        if slot.part == part_type {
            slot.category = category;
            slot.index = index;
            break;
        }
    }
    new_avatar
}

/// Commit a confirmed purchase: swap in the new avatar and debit the price.
///
/// Affordability is the caller's responsibility; the debit is unchecked and
/// will push the balance negative when called without that gate.
pub fn confirm_purchase(user: &mut User, new_avatar: Avatar, price: Award) {
    user.avatar = new_avatar;
    user.award.minus(price);
}
